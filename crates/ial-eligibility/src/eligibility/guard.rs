use std::collections::BTreeSet;

use super::domain::{HistoryEntry, QualificationFamily, QualificationLevel, SelectionContext};
use crate::catalog::QualificationCatalog;

/// Input problems that stop a check before any rule is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a subject")]
    MissingSubject,
    #[error("Please select at least one unit")]
    MissingUnits,
    #[error("{subject} is a linear qualification: all {required} papers must be taken in the same series (selected {found})")]
    IncompleteLinearQualification {
        subject: String,
        required: usize,
        found: usize,
    },
    #[error("Cannot mix online ({marker}) and offline variants of the same unit: {}", .units.join(", "))]
    MixedVariants { marker: char, units: Vec<String> },
    #[error("Selected units are locked to different previous awards ({first} and {second})")]
    ConflictingLocks {
        first: QualificationFamily,
        second: QualificationFamily,
    },
    #[error("Units locked to a previous Mathematics award cannot be used for Pure Mathematics: {}", .units.join(", "))]
    MathsLockedUnitsInPureRoute { units: Vec<String> },
    #[error("Units already cashed in must be uncashed before they can be reused: {}", .units.join(", "))]
    CashedInUnitReuse { units: Vec<String> },
}

/// Up-front gate applied to every selection before rule evaluation.
#[derive(Debug, Clone, Copy)]
pub struct SelectionGuard<'a> {
    catalog: &'a QualificationCatalog,
}

impl<'a> SelectionGuard<'a> {
    pub fn new(catalog: &'a QualificationCatalog) -> Self {
        Self { catalog }
    }

    /// Run every check in order and report the first failure.
    pub fn validate(
        &self,
        context: &SelectionContext,
        subject: Option<&str>,
    ) -> Result<(), ValidationError> {
        let subject = subject
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ValidationError::MissingSubject)?;

        let selected = &context.selected_units;
        if selected.is_empty() {
            return Err(ValidationError::MissingUnits);
        }

        let subject_entry = self.catalog.subject(subject);
        if let Some((entry, required)) = subject_entry
            .and_then(|entry| entry.linear_papers.map(|required| (entry, required)))
        {
            // Papers are counted by base code, so an online copy is not a second paper.
            let canonical = self.catalog.canonical_units(selected);
            let found = entry
                .units
                .iter()
                .filter(|unit| canonical.contains(&unit.code))
                .count();
            if found < required {
                return Err(ValidationError::IncompleteLinearQualification {
                    subject: entry.name.clone(),
                    required,
                    found,
                });
            }
        }

        let mixed: Vec<String> = selected
            .iter()
            .filter(|code| selected.contains(&self.catalog.online_code(code)))
            .cloned()
            .collect();
        if !mixed.is_empty() {
            return Err(ValidationError::MixedVariants {
                marker: self.catalog.online_variant_marker(),
                units: mixed,
            });
        }

        self.check_locks(
            selected,
            &context.history,
            subject_entry.and_then(|entry| entry.family),
        )?;

        let cashed_in = self.catalog.canonical_units(&context.cashed_in_units);
        let reused: Vec<String> = selected
            .iter()
            .filter(|code| cashed_in.contains(self.catalog.base_code(code)))
            .cloned()
            .collect();
        if !reused.is_empty() {
            return Err(ValidationError::CashedInUnitReuse { units: reused });
        }

        Ok(())
    }

    fn check_locks(
        &self,
        selected: &BTreeSet<String>,
        history: &[HistoryEntry],
        family: Option<QualificationFamily>,
    ) -> Result<(), ValidationError> {
        let locks: Vec<(&String, QualificationFamily)> = selected
            .iter()
            .filter_map(|code| {
                lock_group_for(self.catalog, code, history).map(|group| (code, group))
            })
            .collect();

        if let Some((_, first)) = locks.first() {
            if let Some((_, second)) = locks.iter().find(|(_, group)| group != first) {
                return Err(ValidationError::ConflictingLocks {
                    first: *first,
                    second: *second,
                });
            }
        }

        if family == Some(QualificationFamily::PureMathematics) {
            let maths_locked: Vec<String> = locks
                .iter()
                .filter(|(_, group)| *group == QualificationFamily::Mathematics)
                .map(|(code, _)| (*code).clone())
                .collect();
            if !maths_locked.is_empty() {
                return Err(ValidationError::MathsLockedUnitsInPureRoute {
                    units: maths_locked,
                });
            }
        }

        Ok(())
    }
}

/// Lock group a unit is tied to by the most recent A level award still cashed in.
pub fn lock_group_for(
    catalog: &QualificationCatalog,
    code: &str,
    history: &[HistoryEntry],
) -> Option<QualificationFamily> {
    let latest = latest_a_level(history)?;

    match latest.family {
        QualificationFamily::PureMathematics if catalog.is_pure(code) => {
            Some(QualificationFamily::PureMathematics)
        }
        QualificationFamily::PureMathematics => None,
        QualificationFamily::Mathematics => Some(QualificationFamily::Mathematics),
        QualificationFamily::FurtherMathematics => Some(QualificationFamily::FurtherMathematics),
    }
}

// Ties on date keep the entry listed first.
fn latest_a_level(history: &[HistoryEntry]) -> Option<&HistoryEntry> {
    history
        .iter()
        .filter(|entry| !entry.uncashed && entry.level == QualificationLevel::A)
        .fold(None, |latest: Option<&HistoryEntry>, entry| match latest {
            Some(current) if current.date >= entry.date => Some(current),
            _ => Some(entry),
        })
}
