//! Money rounding and tolerance helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary values are `rust_decimal::Decimal`; these helpers define the
//! currency unit granularity and the settlement tolerance used when deciding
//! whether a balance counts as zero.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// One hundredth of a currency unit, the smallest amount tracked.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Tolerance within which a balance or reconciliation difference is
/// considered zero.
pub const SETTLEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to cents using Banker's Rounding.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount is zero within [`SETTLEMENT_TOLERANCE`].
#[must_use]
pub fn is_settled(amount: Decimal) -> bool {
    amount.abs() <= SETTLEMENT_TOLERANCE
}
