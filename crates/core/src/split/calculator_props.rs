//! Property-based tests for split calculation.
//!
//! The central contract: for any valid specification the finalized shares
//! sum exactly to the expense total, whatever the entry order.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::calculate_splits;
use super::types::SplitSpec;
use super::validation::validate_splits;

/// Strategy producing a total and a spec list that is valid by
/// construction: percentages stay below 60% combined, exact amounts below
/// 30% of the total, and at least one equal entry absorbs the remainder.
fn valid_case() -> impl Strategy<Value = (Decimal, Vec<SplitSpec>)> {
    (100i64..1_000_000i64).prop_flat_map(|total_cents| {
        let total = Decimal::new(total_cents, 2);
        let pct = (1i64..=2000).prop_map(|n| Decimal::new(n, 2));
        let exact = (1i64..=total_cents / 10).prop_map(|c| Decimal::new(c, 2));
        (
            prop::collection::vec(pct, 0..4),
            prop::collection::vec(exact, 0..4),
            1usize..5,
        )
            .prop_map(move |(pcts, exacts, n_equal)| {
                let mut specs = Vec::new();
                for (i, p) in pcts.into_iter().enumerate() {
                    specs.push(SplitSpec::percentage(format!("P{i}"), p));
                }
                for (i, e) in exacts.into_iter().enumerate() {
                    specs.push(SplitSpec::exact(format!("X{i}"), e));
                }
                for i in 0..n_equal {
                    specs.push(SplitSpec::equal(format!("Q{i}")));
                }
                (total, specs)
            })
    })
}

/// Same cases with the entries in a random order.
fn shuffled_valid_case() -> impl Strategy<Value = (Decimal, Vec<SplitSpec>)> {
    valid_case().prop_flat_map(|(total, specs)| (Just(total), Just(specs).prop_shuffle()))
}

fn total_of(total: Decimal, specs: &[SplitSpec]) -> Decimal {
    calculate_splits(specs, total)
        .iter()
        .map(|s| s.calculated_amount)
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// For any valid spec, the shares sum exactly to the total.
    #[test]
    fn prop_shares_sum_to_total((total, specs) in valid_case()) {
        prop_assert!(validate_splits(&specs, total).is_empty());
        prop_assert_eq!(total_of(total, &specs), total);
    }

    /// The sum invariant holds for every permutation of the entries.
    #[test]
    fn prop_sum_invariant_under_permutation((total, specs) in shuffled_valid_case()) {
        prop_assert!(validate_splits(&specs, total).is_empty());
        prop_assert_eq!(total_of(total, &specs), total);
    }

    /// Calculation is deterministic: same input, same output.
    #[test]
    fn prop_calculation_deterministic((total, specs) in valid_case()) {
        let first = calculate_splits(&specs, total);
        let second = calculate_splits(&specs, total);
        prop_assert_eq!(first, second);
    }

    /// Output length and order mirror the input.
    #[test]
    fn prop_output_preserves_input_order((total, specs) in shuffled_valid_case()) {
        let result = calculate_splits(&specs, total);
        prop_assert_eq!(result.len(), specs.len());
        for (spec, finalized) in specs.iter().zip(&result) {
            prop_assert_eq!(&finalized.person_name, &spec.person_name);
            prop_assert_eq!(finalized.kind, spec.kind);
        }
    }
}
