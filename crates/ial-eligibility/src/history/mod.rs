//! Qualification history import from CSV exports.
//!
//! Expected header: `Level,Qualification,Awarded On,Uncashed`. The qualification column takes a
//! family name (`Mathematics`, `FURTHER_MATHEMATICS`) or a catalog exam code (`YMA01`); with an
//! exam code the level column may be left blank.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::catalog::QualificationCatalog;
use crate::eligibility::domain::{HistoryEntry, QualificationFamily, QualificationLevel};

use normalizer::normalize_label;
use parser::HistoryRecord;

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => {
                write!(f, "failed to read qualification history: {}", err)
            }
            HistoryImportError::Csv(err) => write!(f, "invalid qualification history CSV: {}", err),
            HistoryImportError::InvalidRow { line, reason } => {
                write!(f, "qualification history line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
            HistoryImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct HistoryImporter;

impl HistoryImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        catalog: &QualificationCatalog,
    ) -> Result<Vec<HistoryEntry>, HistoryImportError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "importing qualification history");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, catalog)
    }

    /// Entries come back in file order; the lock derivation relies on it for date ties.
    pub fn from_reader<R: Read>(
        reader: R,
        catalog: &QualificationCatalog,
    ) -> Result<Vec<HistoryEntry>, HistoryImportError> {
        let entries = parser::parse_records(reader)?
            .into_iter()
            .map(|record| entry_from_record(record, catalog))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(entries = entries.len(), "qualification history imported");
        Ok(entries)
    }
}

fn entry_from_record(
    record: HistoryRecord,
    catalog: &QualificationCatalog,
) -> Result<HistoryEntry, HistoryImportError> {
    let line = record.line;
    let invalid = |reason: String| HistoryImportError::InvalidRow { line, reason };

    let declared_level = match record.level.as_deref() {
        Some(raw) => Some(level_from_label(raw).ok_or_else(|| {
            invalid(format!("unknown level '{raw}' (expected AS, IAS, A or IAL)"))
        })?),
        None => None,
    };

    let (family, level) = match family_from_label(&record.qualification) {
        Some(family) => {
            let level = declared_level
                .ok_or_else(|| invalid("a level is required for family names".to_string()))?;
            (family, level)
        }
        None => {
            let code = record.qualification.to_ascii_uppercase();
            let qualification = catalog.qualification(&code).ok_or_else(|| {
                invalid(format!(
                    "unknown qualification '{}'",
                    record.qualification
                ))
            })?;
            let family = qualification.family.ok_or_else(|| {
                invalid(format!(
                    "{} is not a mathematics qualification",
                    qualification.display_name
                ))
            })?;
            if let Some(level) = declared_level {
                if level != qualification.level {
                    return Err(invalid(format!(
                        "level {} does not match {} ({})",
                        level.label(),
                        qualification.display_name,
                        qualification.level.label()
                    )));
                }
            }
            (family, qualification.level)
        }
    };

    let raw_date = record
        .awarded_on
        .ok_or_else(|| invalid("missing award date".to_string()))?;
    let date = parser::parse_date(&raw_date)
        .ok_or_else(|| invalid(format!("invalid award date '{raw_date}'")))?;

    let uncashed = match record.uncashed.as_deref() {
        Some(raw) => parser::parse_flag(raw)
            .ok_or_else(|| invalid(format!("invalid uncashed flag '{raw}'")))?,
        None => false,
    };

    Ok(HistoryEntry {
        level,
        family,
        date,
        uncashed,
    })
}

fn level_from_label(value: &str) -> Option<QualificationLevel> {
    match normalize_label(value).as_str() {
        "as" | "ias" => Some(QualificationLevel::As),
        "a" | "ial" => Some(QualificationLevel::A),
        _ => None,
    }
}

fn family_from_label(value: &str) -> Option<QualificationFamily> {
    match normalize_label(value).as_str() {
        "mathematics" | "maths" => Some(QualificationFamily::Mathematics),
        "further mathematics" | "further maths" => Some(QualificationFamily::FurtherMathematics),
        "pure mathematics" | "pure maths" => Some(QualificationFamily::PureMathematics),
        _ => None,
    }
}
