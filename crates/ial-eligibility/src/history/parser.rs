use std::io::Read;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// One CSV row, untouched apart from trimming.
#[derive(Debug)]
pub(crate) struct HistoryRecord {
    pub(crate) line: u64,
    pub(crate) level: Option<String>,
    pub(crate) qualification: String,
    pub(crate) awarded_on: Option<String>,
    pub(crate) uncashed: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<HistoryRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: HistoryRow = record.deserialize(Some(&headers))?;

        records.push(HistoryRecord {
            line,
            level: row.level,
            qualification: row.qualification,
            awarded_on: row.awarded_on,
            uncashed: row.uncashed,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    #[serde(rename = "Level", default, deserialize_with = "empty_string_as_none")]
    level: Option<String>,
    #[serde(rename = "Qualification")]
    qualification: String,
    #[serde(
        rename = "Awarded On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    awarded_on: Option<String>,
    #[serde(rename = "Uncashed", default, deserialize_with = "empty_string_as_none")]
    uncashed: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}
