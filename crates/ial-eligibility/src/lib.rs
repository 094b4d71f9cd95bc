//! Eligibility rules engine for International A Level unit aggregation.
//!
//! A [`catalog::QualificationCatalog`] describes subjects, units and the rule each
//! qualification is awarded under. The [`eligibility::EligibilityEngine`] validates a
//! [`eligibility::SelectionContext`] and reports which qualifications the selected
//! units satisfy and what is still missing for the rest.

pub mod catalog;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod history;
pub mod telemetry;
