use super::common::*;
use crate::catalog::CatalogError;
use crate::eligibility::aggregate::{aggregate, CheckMode};
use crate::eligibility::allocation::AllocationShortfall;
use crate::eligibility::domain::{MissingItem, QualificationId};
use crate::eligibility::guard::ValidationError;
use crate::eligibility::EligibilityError;

fn ids(values: &[&str]) -> Vec<QualificationId> {
    values.iter().map(|id| QualificationId::new(*id)).collect()
}

#[test]
fn single_mode_checks_one_qualification() {
    let verdict = engine()
        .check(
            &CheckMode::Single(QualificationId::new("YMA01")),
            &context(&FULL_MATHS),
        )
        .expect("check succeeds");

    assert!(verdict.is_eligible_for("YMA01"));
    assert_eq!(verdict.eligible.len(), 1);
    assert!(verdict.missing.is_empty());
    assert_eq!(verdict.eligible[0].display_name, "IAL Mathematics");
}

#[test]
fn all_mathematics_mode_partitions_every_award() {
    let verdict = engine()
        .check(&CheckMode::AllMathematics, &context(&FULL_MATHS))
        .expect("check succeeds");

    let eligible: Vec<&str> = verdict
        .eligible
        .iter()
        .map(|result| result.qualification_id.as_str())
        .collect();
    let missing: Vec<&str> = verdict
        .missing
        .iter()
        .map(|requirement| requirement.qualification_id.as_str())
        .collect();
    assert_eq!(eligible, vec!["XMA01", "YMA01"]);
    assert_eq!(missing, vec!["XFM01", "YFM01", "XPM01", "YPM01"]);

    let further = verdict.missing_for("XFM01").expect("XFM01 missing");
    assert_eq!(
        further.summary(),
        "WFM01 is required, Need 3 units excluding WMA11, WMA12, WMA13, WMA14 (currently have 2)"
    );
}

#[test]
fn further_maths_accepts_seven_applied_and_further_units() {
    let selected = [
        "WFM01", "WFM02", "WME01", "WME02", "WST01", "WST02", "WDM11",
    ];

    let verdict = engine()
        .check(
            &CheckMode::Subject("FURTHER_MATHEMATICS".to_string()),
            &context(&selected),
        )
        .expect("check succeeds");

    assert!(verdict.is_eligible_for("XFM01"));
    assert!(verdict.is_eligible_for("YFM01"));
}

#[test]
fn subject_mode_reports_missing_units_for_the_a_level() {
    let verdict = engine()
        .check(
            &CheckMode::Subject("BIOLOGY".to_string()),
            &context(&["WBI11", "WBI12", "WBI13"]),
        )
        .expect("check succeeds");

    assert!(verdict.is_eligible_for("XBI11"));
    let a_level = verdict.missing_for("YBI11").expect("A level missing");
    assert_eq!(
        a_level.missing_items,
        vec![
            MissingItem::Unit {
                code: "WBI14".to_string()
            },
            MissingItem::Unit {
                code: "WBI15".to_string()
            },
            MissingItem::Unit {
                code: "WBI16".to_string()
            },
        ]
    );
}

#[test]
fn validation_failure_produces_no_verdict() {
    let result = engine().check(
        &CheckMode::AllMathematics,
        &context(&["WMA11", "WMA11C", "WMA12", "WST01"]),
    );

    match result {
        Err(EligibilityError::Validation(ValidationError::MixedVariants { units, .. })) => {
            assert_eq!(units, vec!["WMA11"])
        }
        other => panic!("expected mixed variants, got {other:?}"),
    }
}

#[test]
fn blank_qualification_is_a_missing_subject() {
    match engine().check(&CheckMode::Single(QualificationId::new(" ")), &context(&[])) {
        Err(EligibilityError::Validation(ValidationError::MissingSubject)) => {}
        other => panic!("expected missing subject, got {other:?}"),
    }
}

#[test]
fn unknown_targets_are_catalog_errors() {
    match engine().check(
        &CheckMode::Single(QualificationId::new("ZZZ99")),
        &context(&["WMA11"]),
    ) {
        Err(EligibilityError::Catalog(CatalogError::UnknownQualification(id))) => {
            assert_eq!(id, "ZZZ99")
        }
        other => panic!("expected unknown qualification, got {other:?}"),
    }

    match engine().check(
        &CheckMode::Subject("ASTRONOMY".to_string()),
        &context(&["WAS01"]),
    ) {
        Err(EligibilityError::Catalog(CatalogError::UnknownSubject(key))) => {
            assert_eq!(key, "ASTRONOMY")
        }
        other => panic!("expected unknown subject, got {other:?}"),
    }
}

#[test]
fn aggregate_validates_then_evaluates_in_order() {
    let catalog = catalog();

    let verdict = aggregate(
        &ids(&["YPM01", "XPM01"]),
        &catalog,
        &context(&["WMA11", "WMA12", "WFM01"]),
        Some("PURE_MATHEMATICS"),
    )
    .expect("aggregate succeeds");

    assert_eq!(verdict.eligible[0].qualification_id.as_str(), "XPM01");
    assert_eq!(verdict.missing[0].qualification_id.as_str(), "YPM01");

    match aggregate(&ids(&["XPM01"]), &catalog, &context(&["WMA11"]), None) {
        Err(EligibilityError::Validation(ValidationError::MissingSubject)) => {}
        other => panic!("expected missing subject, got {other:?}"),
    }
}

#[test]
fn check_mode_round_trips_through_json() {
    let mode: CheckMode =
        serde_json::from_str(r#"{ "mode": "single", "target": "YMA01" }"#).expect("mode parses");
    assert_eq!(mode, CheckMode::Single(QualificationId::new("YMA01")));

    let all: CheckMode =
        serde_json::from_str(r#"{ "mode": "all_mathematics" }"#).expect("mode parses");
    assert_eq!(all, CheckMode::AllMathematics);
}

#[test]
fn dual_check_allocates_a_disjoint_split() {
    let outcome = engine()
        .check_dual(
            &QualificationId::new("YMA01"),
            &QualificationId::new("YFM01"),
            &context(&DUAL_POOL),
        )
        .expect("dual check succeeds");

    assert!(outcome.is_dual_eligible());
    assert!(outcome.notes.is_empty());
    assert!(outcome.verdict.is_eligible_for("YMA01"));
    assert!(outcome.verdict.is_eligible_for("YFM01"));

    let allocation = outcome.allocation.expect("allocation present");
    assert_eq!(allocation.primary, units(&FULL_MATHS));
    assert_eq!(
        allocation.secondary,
        units(&["WFM01", "WFM02", "WME01", "WME02", "WDM11", "WST03"])
    );
}

#[test]
fn dual_check_explains_a_missing_split() {
    let outcome = engine()
        .check_dual(
            &QualificationId::new("YMA01"),
            &QualificationId::new("YFM01"),
            &context(&FULL_MATHS),
        )
        .expect("dual check succeeds");

    assert!(!outcome.is_dual_eligible());
    assert_eq!(
        outcome.shortfall,
        Some(AllocationShortfall::TooFewUnits {
            needed: 10,
            selected: 6
        })
    );
    assert_eq!(
        outcome.notes,
        vec!["At least 10 units are needed across both qualifications (currently selected: 6)"]
    );
}

#[test]
fn dual_check_treats_cashed_in_reuse_as_fatal() {
    let context = context(&DUAL_POOL).with_cashed_in(["WFM01"]);

    match engine().check_dual(
        &QualificationId::new("YMA01"),
        &QualificationId::new("YFM01"),
        &context,
    ) {
        Err(EligibilityError::Validation(ValidationError::CashedInUnitReuse { units })) => {
            assert_eq!(units, vec!["WFM01"])
        }
        other => panic!("expected cashed-in reuse, got {other:?}"),
    }
}

#[test]
fn dual_check_requires_pair_and_threshold_rules() {
    match engine().check_dual(
        &QualificationId::new("XMA01"),
        &QualificationId::new("YFM01"),
        &context(&DUAL_POOL),
    ) {
        Err(EligibilityError::Catalog(CatalogError::RuleShape {
            id,
            expected,
            found,
        })) => {
            assert_eq!(id, "XMA01");
            assert_eq!(expected, "required_plus_pair");
            assert_eq!(found, "required_plus_one_of");
        }
        other => panic!("expected rule shape error, got {other:?}"),
    }
}

#[test]
fn online_pure_units_do_not_count_towards_further_maths() {
    let engine = engine();
    let pure: Vec<String> = ["WMA11", "WMA12", "WMA13", "WMA14"]
        .iter()
        .map(|code| code.to_string())
        .collect();

    let verdict = engine
        .check(
            &CheckMode::Single(QualificationId::new("YFM01")),
            &context(&["WFM01", "WFM02", "WMA11C", "WMA12C", "WMA13C", "WMA14C"]),
        )
        .expect("check succeeds");
    assert!(!verdict.is_eligible_for("YFM01"));
    assert_eq!(
        verdict.missing_for("YFM01").expect("YFM01 missing").missing_items,
        vec![MissingItem::MinUnits {
            required: 6,
            excluding: pure.clone(),
            have: 2,
        }]
    );

    let verdict = engine
        .check(
            &CheckMode::Single(QualificationId::new("XFM01")),
            &context(&["WFM01", "WMA11C", "WMA12C"]),
        )
        .expect("check succeeds");
    assert_eq!(
        verdict.missing_for("XFM01").expect("XFM01 missing").missing_items,
        vec![MissingItem::MinUnits {
            required: 3,
            excluding: pure,
            have: 1,
        }]
    );
}

#[test]
fn online_units_satisfy_mathematics_awards() {
    let verdict = engine()
        .check(
            &CheckMode::Subject("MATHEMATICS".to_string()),
            &context(&["WMA11C", "WMA12C", "WMA13C", "WMA14C", "WST01C", "WST02C"]),
        )
        .expect("check succeeds");

    assert!(verdict.is_eligible_for("XMA01"));
    assert!(verdict.is_eligible_for("YMA01"));
    assert!(verdict.missing.is_empty());
}

#[test]
fn dual_check_folds_online_variants_before_splitting() {
    let outcome = engine()
        .check_dual(
            &QualificationId::new("YMA01"),
            &QualificationId::new("YFM01"),
            &context(&[
                "WMA11C", "WMA12C", "WMA13C", "WMA14C", "WST01", "WST02", "WFM01", "WFM02C",
                "WME01", "WME02", "WDM11", "WST03",
            ]),
        )
        .expect("dual check succeeds");

    let allocation = outcome.allocation.expect("allocation present");
    assert_eq!(allocation.primary, units(&FULL_MATHS));
    assert!(allocation.secondary.contains("WFM02"));
    assert!(allocation.primary.is_disjoint(&allocation.secondary));
}

#[test]
fn dual_check_splits_the_twelve_unit_mechanics_pool() {
    let outcome = engine()
        .check_dual(
            &QualificationId::new("YMA01"),
            &QualificationId::new("YFM01"),
            &context(&[
                "WMA11", "WMA12", "WMA13", "WMA14", "WST01", "WST02", "WFM01", "WFM02", "WME01",
                "WME02", "WME03", "WST03",
            ]),
        )
        .expect("dual check succeeds");

    let allocation = outcome.allocation.expect("allocation present");
    assert_eq!(allocation.primary, units(&FULL_MATHS));
    assert_eq!(
        allocation.secondary,
        units(&["WFM01", "WFM02", "WME01", "WME02", "WME03", "WST03"])
    );
    assert!(allocation.primary.is_disjoint(&allocation.secondary));
}
