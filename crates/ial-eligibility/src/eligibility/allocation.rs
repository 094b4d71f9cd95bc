use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::{PairRule, ThresholdRule};

/// Disjoint split of one selection across two qualifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub primary: BTreeSet<String>,
    pub secondary: BTreeSet<String>,
    /// The pair the primary qualification consumed.
    pub pair: (String, String),
}

/// Why [`allocate`] produced no partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AllocationShortfall {
    TooFewUnits { needed: usize, selected: usize },
    PrimaryUnsatisfied,
    SecondaryUnsatisfied,
    SecondaryShortAfterSplit,
}

impl AllocationShortfall {
    pub fn summary(&self) -> String {
        match self {
            AllocationShortfall::TooFewUnits { needed, selected } => format!(
                "At least {needed} units are needed across both qualifications (currently selected: {selected})"
            ),
            AllocationShortfall::PrimaryUnsatisfied | AllocationShortfall::SecondaryUnsatisfied => {
                "Please check the individual qualification requirements".to_string()
            }
            AllocationShortfall::SecondaryShortAfterSplit => {
                "Both qualifications are met individually but not with separate units".to_string()
            }
        }
    }
}

/// Greedy partition: the primary takes its required units and the first fully present pair
/// in declared order, the secondary takes the rest. No other pair is tried.
pub fn allocate(
    selected: &BTreeSet<String>,
    primary: &PairRule,
    secondary: &ThresholdRule,
) -> Option<Allocation> {
    try_allocate(selected, primary, secondary).ok()
}

pub(crate) fn try_allocate(
    selected: &BTreeSet<String>,
    primary: &PairRule,
    secondary: &ThresholdRule,
) -> Result<Allocation, AllocationShortfall> {
    let needed = primary.required.len() + secondary.min_units;
    if selected.len() < needed {
        return Err(AllocationShortfall::TooFewUnits {
            needed,
            selected: selected.len(),
        });
    }

    if !primary.evaluate(selected).satisfied {
        return Err(AllocationShortfall::PrimaryUnsatisfied);
    }
    if !secondary.evaluate(selected).satisfied {
        return Err(AllocationShortfall::SecondaryUnsatisfied);
    }

    let pair = primary
        .first_satisfied_pair(selected)
        .cloned()
        .ok_or(AllocationShortfall::PrimaryUnsatisfied)?;

    let mut primary_units: BTreeSet<String> = primary.required.iter().cloned().collect();
    primary_units.insert(pair.0.clone());
    primary_units.insert(pair.1.clone());

    let secondary_units: BTreeSet<String> =
        selected.difference(&primary_units).cloned().collect();

    let outcome = secondary.evaluate(&secondary_units);
    if !outcome.satisfied {
        debug!(missing = ?outcome.missing, "secondary qualification short after split");
        return Err(AllocationShortfall::SecondaryShortAfterSplit);
    }

    Ok(Allocation {
        primary: primary_units,
        secondary: secondary_units,
        pair,
    })
}
