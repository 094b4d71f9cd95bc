//! Qualification catalog: subjects, units and the rule each qualification is awarded under.
//!
//! The catalog is configuration. The engine only reads it, so a single instance can be
//! shared across any number of checks.

mod loader;
mod standard;

pub use loader::CatalogLoadError;

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::eligibility::domain::{QualificationFamily, QualificationId, QualificationLevel};
use crate::eligibility::rules::QualificationRule;

pub const DEFAULT_ONLINE_VARIANT_MARKER: char = 'C';

/// Problems resolving or validating catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown qualification '{0}'")]
    UnknownQualification(String),
    #[error("unknown subject '{0}'")]
    UnknownSubject(String),
    #[error("qualification '{0}' is declared more than once")]
    DuplicateQualification(String),
    #[error("qualification '{id}' uses a {found} rule but a {expected} rule is required")]
    RuleShape {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("qualification '{0}' has a choice clause with no alternatives")]
    EmptyAlternatives(String),
}

/// A single assessable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_variant_group: Option<String>,
}

/// A subject groups the units a set of qualifications draw on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub key: String,
    pub name: String,
    pub units: Vec<Unit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<QualificationFamily>,
    /// Papers that must be sat together for a linear qualification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_papers: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A catalog qualification and the rule it is awarded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    pub id: QualificationId,
    pub subject: String,
    pub display_name: String,
    pub exam_code: String,
    pub level: QualificationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<QualificationFamily>,
    pub rule: QualificationRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationCatalog {
    #[serde(default = "default_online_variant_marker")]
    online_variant_marker: char,
    #[serde(default)]
    pure_units: BTreeSet<String>,
    subjects: Vec<Subject>,
    qualifications: Vec<Qualification>,
}

fn default_online_variant_marker() -> char {
    DEFAULT_ONLINE_VARIANT_MARKER
}

impl QualificationCatalog {
    pub fn new(
        subjects: Vec<Subject>,
        qualifications: Vec<Qualification>,
        pure_units: BTreeSet<String>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            online_variant_marker: DEFAULT_ONLINE_VARIANT_MARKER,
            pure_units,
            subjects,
            qualifications,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the engine: IAL subjects plus the six mathematics awards.
    pub fn standard() -> Self {
        standard::catalog()
    }

    pub fn online_variant_marker(&self) -> char {
        self.online_variant_marker
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn qualifications(&self) -> &[Qualification] {
        &self.qualifications
    }

    pub fn subject(&self, key: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.key == key)
    }

    pub fn qualification(&self, id: &str) -> Option<&Qualification> {
        self.qualifications
            .iter()
            .find(|qualification| qualification.id.as_str() == id)
    }

    pub fn require(&self, id: &str) -> Result<&Qualification, CatalogError> {
        self.qualification(id)
            .ok_or_else(|| CatalogError::UnknownQualification(id.to_string()))
    }

    /// Qualifications of one subject in declaration order.
    pub fn qualifications_for_subject(
        &self,
        key: &str,
    ) -> Result<Vec<&Qualification>, CatalogError> {
        if self.subject(key).is_none() {
            return Err(CatalogError::UnknownSubject(key.to_string()));
        }

        Ok(self
            .qualifications
            .iter()
            .filter(|qualification| qualification.subject == key)
            .collect())
    }

    /// Every mathematics-family qualification in declaration order.
    pub fn mathematics_qualifications(&self) -> Vec<&Qualification> {
        self.qualifications
            .iter()
            .filter(|qualification| qualification.family.is_some())
            .collect()
    }

    /// True for pure mathematics units; an online variant counts as its offline unit.
    pub fn is_pure(&self, code: &str) -> bool {
        self.pure_units.contains(code)
            || self
                .offline_code(code)
                .map(|base| self.pure_units.contains(base))
                .unwrap_or(false)
    }

    /// The offline code an online variant shares its identity with.
    pub fn offline_code<'a>(&self, code: &'a str) -> Option<&'a str> {
        code.strip_suffix(self.online_variant_marker)
            .filter(|base| !base.is_empty())
    }

    pub fn online_code(&self, code: &str) -> String {
        format!("{code}{}", self.online_variant_marker)
    }

    pub fn unit(&self, code: &str) -> Option<&Unit> {
        self.subjects
            .iter()
            .flat_map(|subject| subject.units.iter())
            .find(|unit| unit.code == code)
    }

    /// Offline code of a catalog unit's online variant; any other code is returned as is.
    pub fn base_code<'a>(&self, code: &'a str) -> &'a str {
        match self.offline_code(code) {
            Some(base) if self.unit(base).is_some() => base,
            _ => code,
        }
    }

    /// The selection as rules see it, with online variants folded onto their offline units.
    pub fn canonical_units(&self, selected: &BTreeSet<String>) -> BTreeSet<String> {
        selected
            .iter()
            .map(|code| self.base_code(code).to_string())
            .collect()
    }

    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        let subject_keys: HashSet<&str> = self
            .subjects
            .iter()
            .map(|subject| subject.key.as_str())
            .collect();
        let mut seen: HashSet<&str> = HashSet::new();

        for qualification in &self.qualifications {
            let id = qualification.id.as_str();
            if !seen.insert(id) {
                return Err(CatalogError::DuplicateQualification(id.to_string()));
            }
            if !subject_keys.contains(qualification.subject.as_str()) {
                return Err(CatalogError::UnknownSubject(qualification.subject.clone()));
            }
            if qualification.rule.has_empty_alternatives() {
                return Err(CatalogError::EmptyAlternatives(id.to_string()));
            }
        }

        Ok(())
    }
}
