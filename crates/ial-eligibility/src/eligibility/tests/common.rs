use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::catalog::QualificationCatalog;
use crate::eligibility::domain::{
    HistoryEntry, QualificationFamily, QualificationLevel, SelectionContext,
};
use crate::eligibility::rules::{OneOfRule, PairRule, ThresholdRule};
use crate::eligibility::EligibilityEngine;

pub(super) fn units(codes: &[&str]) -> BTreeSet<String> {
    codes.iter().map(|code| code.to_string()).collect()
}

fn strings(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|code| code.to_string()).collect()
}

pub(super) fn catalog() -> QualificationCatalog {
    QualificationCatalog::standard()
}

pub(super) fn engine() -> EligibilityEngine {
    EligibilityEngine::new(catalog())
}

pub(super) fn context(codes: &[&str]) -> SelectionContext {
    SelectionContext::new(codes.iter().copied())
}

pub(super) fn award(
    level: QualificationLevel,
    family: QualificationFamily,
    year: i32,
    month: u32,
) -> HistoryEntry {
    HistoryEntry {
        level,
        family,
        date: NaiveDate::from_ymd_opt(year, month, 1).expect("valid date"),
        uncashed: false,
    }
}

/// Short-code rule used in worked examples: P1 + P2 + one of S1/M1/D1.
pub(super) fn one_of_rule() -> OneOfRule {
    OneOfRule {
        required: strings(&["P1", "P2"]),
        one_of: strings(&["S1", "M1", "D1"]),
    }
}

/// Short-code Further Mathematics rule: FP1, one of FP2/FP3, six units outside P1..P4.
pub(super) fn further_maths_rule() -> ThresholdRule {
    ThresholdRule {
        required: strings(&["FP1"]),
        at_least_one_of: strings(&["FP2", "FP3"]),
        excluding: strings(&["P1", "P2", "P3", "P4"]),
        min_units: 6,
    }
}

/// Short-code Mathematics rule: P1..P4 plus one pair, in declared order.
pub(super) fn maths_pair_rule() -> PairRule {
    PairRule {
        required: strings(&["P1", "P2", "P3", "P4"]),
        pairs: vec![
            ("S1".to_string(), "S2".to_string()),
            ("M1".to_string(), "M2".to_string()),
            ("S1".to_string(), "M1".to_string()),
            ("S1".to_string(), "D1".to_string()),
            ("M1".to_string(), "D1".to_string()),
        ],
    }
}

pub(super) const FULL_MATHS: [&str; 6] = ["WMA11", "WMA12", "WMA13", "WMA14", "WST01", "WST02"];

pub(super) const DUAL_POOL: [&str; 12] = [
    "WMA11", "WMA12", "WMA13", "WMA14", "WST01", "WST02", "WFM01", "WFM02", "WME01", "WME02",
    "WDM11", "WST03",
];
