use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{
    MissingRequirement, QualificationId, QualificationResult, SelectionContext, Verdict,
};
use super::guard::SelectionGuard;
use super::EligibilityError;
use crate::catalog::{CatalogError, Qualification, QualificationCatalog};

/// Which qualifications a check covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "target", rename_all = "snake_case")]
pub enum CheckMode {
    /// Exactly one qualification.
    Single(QualificationId),
    /// Every qualification of one subject, AS before A.
    Subject(String),
    /// The six IAS/IAL mathematics awards.
    AllMathematics,
}

impl CheckMode {
    /// Subject key the guard validates against. `None` when nothing was chosen.
    pub fn subject<'a>(
        &'a self,
        catalog: &'a QualificationCatalog,
    ) -> Result<Option<&'a str>, CatalogError> {
        match self {
            CheckMode::Single(id) if id.as_str().trim().is_empty() => Ok(None),
            CheckMode::Single(id) => Ok(Some(catalog.require(id.as_str())?.subject.as_str())),
            CheckMode::Subject(key) if key.trim().is_empty() => Ok(None),
            CheckMode::Subject(key) => Ok(Some(key.as_str())),
            CheckMode::AllMathematics => Ok(Some("MATHEMATICS")),
        }
    }

    /// Qualification ids in catalog declaration order.
    pub fn qualification_ids(
        &self,
        catalog: &QualificationCatalog,
    ) -> Result<Vec<QualificationId>, CatalogError> {
        match self {
            CheckMode::Single(id) => Ok(vec![catalog.require(id.as_str())?.id.clone()]),
            CheckMode::Subject(key) => Ok(catalog
                .qualifications_for_subject(key.trim())?
                .into_iter()
                .map(|qualification| qualification.id.clone())
                .collect()),
            CheckMode::AllMathematics => Ok(catalog
                .mathematics_qualifications()
                .into_iter()
                .map(|qualification| qualification.id.clone())
                .collect()),
        }
    }
}

/// Validate the context, then evaluate each qualification independently against the full
/// selection. Validation failures short-circuit; no partial verdict is produced.
pub fn aggregate(
    qualification_ids: &[QualificationId],
    catalog: &QualificationCatalog,
    context: &SelectionContext,
    subject: Option<&str>,
) -> Result<Verdict, EligibilityError> {
    if let Err(violation) = SelectionGuard::new(catalog).validate(context, subject) {
        warn!(subject = subject.unwrap_or("<none>"), %violation, "selection rejected");
        return Err(violation.into());
    }

    let qualifications = qualification_ids
        .iter()
        .map(|id| catalog.require(id.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let selected = catalog.canonical_units(&context.selected_units);
    Ok(evaluate_all(&qualifications, &selected))
}

/// Rules see canonical codes only; callers fold online variants first.
pub(crate) fn evaluate_all(
    qualifications: &[&Qualification],
    selected: &BTreeSet<String>,
) -> Verdict {
    let mut verdict = Verdict::default();

    for qualification in qualifications {
        let outcome = qualification.rule.evaluate(selected);
        debug!(
            qualification = %qualification.id,
            rule = qualification.rule.kind(),
            satisfied = outcome.satisfied,
            missing = outcome.missing.len(),
            "qualification evaluated"
        );

        if outcome.satisfied {
            verdict.eligible.push(QualificationResult {
                qualification_id: qualification.id.clone(),
                display_name: qualification.display_name.clone(),
                exam_code: qualification.exam_code.clone(),
            });
        } else {
            verdict.missing.push(MissingRequirement {
                qualification_id: qualification.id.clone(),
                display_name: qualification.display_name.clone(),
                exam_code: qualification.exam_code.clone(),
                missing_items: outcome.missing,
            });
        }
    }

    verdict
}
