use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog qualifications (e.g. `YMA01`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualificationId(pub String);

impl QualificationId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QualificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Award level of a qualification or history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualificationLevel {
    #[serde(rename = "AS")]
    As,
    #[serde(rename = "A")]
    A,
}

impl QualificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            QualificationLevel::As => "AS",
            QualificationLevel::A => "A",
        }
    }
}

/// Mathematics qualification families. Doubles as the lock group a unit can be tied to
/// once a qualification of that family has been awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationFamily {
    Mathematics,
    FurtherMathematics,
    PureMathematics,
}

impl QualificationFamily {
    pub fn label(&self) -> &'static str {
        match self {
            QualificationFamily::Mathematics => "Mathematics",
            QualificationFamily::FurtherMathematics => "Further Mathematics",
            QualificationFamily::PureMathematics => "Pure Mathematics",
        }
    }
}

impl fmt::Display for QualificationFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A previously awarded qualification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub level: QualificationLevel,
    pub family: QualificationFamily,
    pub date: NaiveDate,
    /// Set once the award has been uncashed; its units no longer carry a lock.
    #[serde(default)]
    pub uncashed: bool,
}

/// Everything a single eligibility request knows about the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub selected_units: BTreeSet<String>,
    #[serde(default)]
    pub cashed_in_units: BTreeSet<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl SelectionContext {
    pub fn new<I, S>(units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_units: units.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_cashed_in<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cashed_in_units = units.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = history;
        self
    }
}

/// A single unmet clause of a qualification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "clause", rename_all = "snake_case")]
pub enum MissingItem {
    Unit {
        code: String,
    },
    OneOf {
        units: Vec<String>,
    },
    ValidPair {
        pairs: Vec<(String, String)>,
    },
    RequiredUnit {
        code: String,
    },
    AtLeastOneOf {
        units: Vec<String>,
    },
    MinUnits {
        required: usize,
        excluding: Vec<String>,
        have: usize,
    },
    RouteAlternatives {
        routes: Vec<String>,
    },
}

impl fmt::Display for MissingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingItem::Unit { code } => f.write_str(code),
            MissingItem::OneOf { units } => write!(f, "One of: {}", units.join(", ")),
            MissingItem::ValidPair { pairs } => {
                let labels: Vec<String> = pairs
                    .iter()
                    .map(|(first, second)| format!("{first}+{second}"))
                    .collect();
                write!(f, "A valid pair from: {}", join_alternatives(&labels, "or"))
            }
            MissingItem::RequiredUnit { code } => write!(f, "{code} is required"),
            MissingItem::AtLeastOneOf { units } => {
                write!(f, "At least one of: {}", units.join(", "))
            }
            MissingItem::MinUnits {
                required,
                excluding,
                have,
            } => write!(
                f,
                "Need {required} units excluding {} (currently have {have})",
                excluding.join(", ")
            ),
            MissingItem::RouteAlternatives { routes } => {
                write!(f, "One of the following routes: {}", routes.join("; or "))
            }
        }
    }
}

/// Joins labels as "a, b, or c".
pub(crate) fn join_alternatives(labels: &[String], conjunction: &str) -> String {
    match labels {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{}, {conjunction} {last}", head.join(", ")),
    }
}

/// A qualification the selection satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationResult {
    pub qualification_id: QualificationId,
    pub display_name: String,
    pub exam_code: String,
}

/// A qualification the selection does not yet satisfy, with the unmet clauses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRequirement {
    pub qualification_id: QualificationId,
    pub display_name: String,
    pub exam_code: String,
    pub missing_items: Vec<MissingItem>,
}

impl MissingRequirement {
    pub fn summary(&self) -> String {
        self.missing_items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Aggregated outcome across every qualification a check considered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub eligible: Vec<QualificationResult>,
    pub missing: Vec<MissingRequirement>,
}

impl Verdict {
    pub fn is_eligible_for(&self, id: &str) -> bool {
        self.eligible
            .iter()
            .any(|result| result.qualification_id.as_str() == id)
    }

    pub fn missing_for(&self, id: &str) -> Option<&MissingRequirement> {
        self.missing
            .iter()
            .find(|requirement| requirement.qualification_id.as_str() == id)
    }
}
