use proptest::prelude::*;

use super::common::*;
use crate::eligibility::allocation::{allocate, try_allocate, AllocationShortfall};

#[test]
fn twelve_units_split_into_disjoint_allocations() {
    let allocation = allocate(
        &units(&[
            "P1", "P2", "P3", "P4", "S1", "S2", "FP1", "FP2", "M1", "M2", "D1", "S3",
        ]),
        &maths_pair_rule(),
        &further_maths_rule(),
    )
    .expect("partition exists");

    assert_eq!(allocation.primary, units(&["P1", "P2", "P3", "P4", "S1", "S2"]));
    assert_eq!(allocation.secondary, units(&["FP1", "FP2", "M1", "M2", "D1", "S3"]));
    assert_eq!(allocation.pair, ("S1".to_string(), "S2".to_string()));
    assert!(allocation.primary.is_disjoint(&allocation.secondary));
}

#[test]
fn too_few_units_short_circuits() {
    let selected = units(&["P1", "P2", "P3", "P4", "S1", "S2", "FP1", "FP2", "M1"]);

    match try_allocate(&selected, &maths_pair_rule(), &further_maths_rule()) {
        Err(AllocationShortfall::TooFewUnits { needed, selected }) => {
            assert_eq!(needed, 10);
            assert_eq!(selected, 9);
        }
        other => panic!("expected too few units, got {other:?}"),
    }
}

#[test]
fn unsatisfied_primary_is_reported() {
    let selected = units(&[
        "P1", "P2", "P3", "S1", "S2", "FP1", "FP2", "M1", "M2", "D1", "S3",
    ]);

    assert_eq!(
        try_allocate(&selected, &maths_pair_rule(), &further_maths_rule()),
        Err(AllocationShortfall::PrimaryUnsatisfied)
    );
}

#[test]
fn overlap_leaves_secondary_short() {
    // Further maths only reaches six units by counting the pair the maths award consumes.
    let selected = units(&[
        "P1", "P2", "P3", "P4", "S1", "S2", "FP1", "FP2", "FP3", "M1",
    ]);

    let shortfall = try_allocate(&selected, &maths_pair_rule(), &further_maths_rule())
        .expect_err("no disjoint split");

    assert_eq!(shortfall, AllocationShortfall::SecondaryShortAfterSplit);
    assert_eq!(
        shortfall.summary(),
        "Both qualifications are met individually but not with separate units"
    );
}

#[test]
fn primary_takes_the_first_declared_pair() {
    let selected = units(&[
        "P1", "P2", "P3", "P4", "S1", "S2", "M1", "M2", "FP1", "FP2", "FP3", "D1",
    ]);

    let allocation = allocate(&selected, &maths_pair_rule(), &further_maths_rule())
        .expect("first pair leaves enough units");

    assert_eq!(allocation.pair, ("S1".to_string(), "S2".to_string()));
    assert_eq!(allocation.secondary, units(&["M1", "M2", "FP1", "FP2", "FP3", "D1"]));
}

const POOL: [&str; 16] = [
    "P1", "P2", "P3", "P4", "FP1", "FP2", "FP3", "M1", "M2", "M3", "S1", "S2", "S3", "D1",
    "X1", "X2",
];

proptest! {
    #[test]
    fn allocations_are_disjoint_and_cover_the_selection(
        mask in proptest::collection::vec(any::<bool>(), POOL.len())
    ) {
        let codes: Vec<&str> = POOL
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(code, _)| *code)
            .collect();
        let selected = units(&codes);
        let primary = maths_pair_rule();
        let secondary = further_maths_rule();

        if let Some(allocation) = allocate(&selected, &primary, &secondary) {
            prop_assert!(allocation.primary.is_disjoint(&allocation.secondary));
            prop_assert!(primary.evaluate(&allocation.primary).satisfied);
            prop_assert!(secondary.evaluate(&allocation.secondary).satisfied);

            let mut union = allocation.primary.clone();
            union.extend(allocation.secondary.iter().cloned());
            prop_assert_eq!(union, selected);
        }
    }
}
