//! Eligibility rules engine: selection guard, rule evaluation, aggregation and dual allocation.

mod aggregate;
pub mod allocation;
pub mod domain;
mod guard;
pub mod rules;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, CheckMode};
pub use allocation::{allocate, Allocation, AllocationShortfall};
pub use domain::{
    HistoryEntry, MissingItem, MissingRequirement, QualificationFamily, QualificationId,
    QualificationLevel, QualificationResult, SelectionContext, Verdict,
};
pub use guard::{lock_group_for, SelectionGuard, ValidationError};
pub use rules::{evaluate, QualificationRule, RuleOutcome};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{CatalogError, QualificationCatalog};
use rules::{PairRule, ThresholdRule};

/// Anything that stops a check from producing a verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EligibilityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Outcome of checking two qualifications against one pool of units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualVerdict {
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<Allocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<AllocationShortfall>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl DualVerdict {
    pub fn is_dual_eligible(&self) -> bool {
        self.allocation.is_some()
    }
}

/// Stateless evaluator over an immutable catalog.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    catalog: QualificationCatalog,
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new(QualificationCatalog::standard())
    }
}

impl EligibilityEngine {
    pub fn new(catalog: QualificationCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &QualificationCatalog {
        &self.catalog
    }

    pub fn check(
        &self,
        mode: &CheckMode,
        context: &SelectionContext,
    ) -> Result<Verdict, EligibilityError> {
        let subject = mode.subject(&self.catalog)?;
        // A blank target has no qualifications to resolve; the guard reports it.
        let ids = match subject {
            Some(_) => mode.qualification_ids(&self.catalog)?,
            None => Vec::new(),
        };
        let verdict = aggregate(&ids, &self.catalog, context, subject)?;

        info!(
            ?mode,
            selected = context.selected_units.len(),
            eligible = verdict.eligible.len(),
            missing = verdict.missing.len(),
            "eligibility checked"
        );
        Ok(verdict)
    }

    /// Check two qualifications from one pool and split the pool between them when possible.
    /// The primary must use a pair rule and the secondary a threshold rule.
    pub fn check_dual(
        &self,
        primary: &QualificationId,
        secondary: &QualificationId,
        context: &SelectionContext,
    ) -> Result<DualVerdict, EligibilityError> {
        let primary = self.catalog.require(primary.as_str())?;
        let secondary = self.catalog.require(secondary.as_str())?;

        SelectionGuard::new(&self.catalog)
            .validate(context, Some(primary.subject.as_str()))
            .map_err(|violation| {
                warn!(
                    primary = %primary.id,
                    secondary = %secondary.id,
                    %violation,
                    "selection rejected"
                );
                violation
            })?;

        let pair_rule = pair_rule(primary)?;
        let threshold_rule = threshold_rule(secondary)?;

        let selected = self.catalog.canonical_units(&context.selected_units);
        let verdict = aggregate::evaluate_all(&[primary, secondary], &selected);
        let (allocation, shortfall) =
            match allocation::try_allocate(&selected, pair_rule, threshold_rule) {
                Ok(allocation) => (Some(allocation), None),
                Err(shortfall) => (None, Some(shortfall)),
            };

        let notes = shortfall
            .iter()
            .map(AllocationShortfall::summary)
            .collect();

        info!(
            primary = %primary.id,
            secondary = %secondary.id,
            dual_eligible = allocation.is_some(),
            "dual eligibility checked"
        );
        Ok(DualVerdict {
            verdict,
            allocation,
            shortfall,
            notes,
        })
    }
}

fn pair_rule(qualification: &crate::catalog::Qualification) -> Result<&PairRule, CatalogError> {
    match &qualification.rule {
        QualificationRule::RequiredPlusPair(rule) => Ok(rule),
        other => Err(CatalogError::RuleShape {
            id: qualification.id.to_string(),
            expected: "required_plus_pair",
            found: other.kind(),
        }),
    }
}

fn threshold_rule(
    qualification: &crate::catalog::Qualification,
) -> Result<&ThresholdRule, CatalogError> {
    match &qualification.rule {
        QualificationRule::RequiredAtLeastOnePlusExcludingMinCount(rule) => Ok(rule),
        other => Err(CatalogError::RuleShape {
            id: qualification.id.to_string(),
            expected: "required_at_least_one_plus_excluding_min_count",
            found: other.kind(),
        }),
    }
}
