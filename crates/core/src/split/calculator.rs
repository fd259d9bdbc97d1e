//! Share calculation for validated split specifications.
//!
//! All arithmetic is exact decimal. Equal shares are distributed with a
//! cent-level largest-remainder rule so the output always sums back to the
//! expense total:
//! 1. Each equal entry gets the remainder divided by the entry count,
//!    rounded down to cents.
//! 2. Spare whole cents go one each to the earliest equal entries in input
//!    order.
//! 3. Any sub-cent residue goes to the first equal entry.
//!
//! The rule is deterministic: identical input always produces identical
//! output.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use divvy_shared::types::CENT;

use super::types::{FinalizedSplit, SplitKind, SplitSpec};

/// Resolves a validated split specification into finalized per-person
/// shares.
///
/// Input order is preserved. The caller must have run
/// [`validate_splits`](super::validate_splits) first; this function assumes
/// percentage and exact values are present and in range.
///
/// Guarantees `sum(calculated_amount) == total` for any valid input,
/// regardless of how equal, percentage, and exact entries are interleaved.
#[must_use]
pub fn calculate_splits(specs: &[SplitSpec], total: Decimal) -> Vec<FinalizedSplit> {
    // First pass: resolve exact and percentage shares, note equal positions.
    let mut amounts: Vec<Option<Decimal>> = Vec::with_capacity(specs.len());
    let mut equal_positions = Vec::new();
    let mut remaining = total;

    for (i, spec) in specs.iter().enumerate() {
        match spec.kind {
            SplitKind::Exact => {
                let amount = spec.value.unwrap_or(Decimal::ZERO);
                remaining -= amount;
                amounts.push(Some(amount));
            }
            SplitKind::Percentage => {
                let amount = total * spec.value.unwrap_or(Decimal::ZERO) / Decimal::ONE_HUNDRED;
                remaining -= amount;
                amounts.push(Some(amount));
            }
            SplitKind::Equal => {
                equal_positions.push(i);
                amounts.push(None);
            }
        }
    }

    // Second pass: divide the remainder among the equal entries.
    let shares = allocate_equal(remaining, equal_positions.len());
    for (position, share) in equal_positions.into_iter().zip(shares) {
        amounts[position] = Some(share);
    }

    specs
        .iter()
        .zip(amounts)
        .map(|(spec, amount)| FinalizedSplit {
            person_name: spec.person_name.trim().to_string(),
            kind: spec.kind,
            value: spec.value,
            calculated_amount: amount.unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Allocates `remaining` equally across `count` entries using the
/// largest-remainder rule described in the module docs.
///
/// The returned shares always sum exactly to `remaining`.
fn allocate_equal(remaining: Decimal, count: usize) -> Vec<Decimal> {
    if count == 0 {
        return vec![];
    }

    let count_dec = Decimal::from(count as u64);
    let base = (remaining / count_dec).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let leftover = remaining - base * count_dec;

    let extra_cents = (leftover / CENT)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_u64()
        .unwrap_or(0);
    let extra_cents = usize::try_from(extra_cents).unwrap_or(0);
    let residue = leftover - CENT * Decimal::from(extra_cents as u64);

    let mut shares: Vec<Decimal> = (0..count)
        .map(|i| if i < extra_cents { base + CENT } else { base })
        .collect();
    shares[0] += residue;
    shares
}
