//! Business rule validation for split specifications.
//!
//! Unlike most validation in this crate, split validation accumulates every
//! violation rather than returning on the first one. The caller gets the
//! full list of problems in input order and can present them all at once.

use rust_decimal::Decimal;
use thiserror::Error;

use divvy_shared::types::SETTLEMENT_TOLERANCE;

use super::types::{SplitKind, SplitSpec};

/// A single violation found in a split specification.
///
/// `index` fields are 1-based, matching how the entries are presented to
/// people.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitViolation {
    /// The split list was empty.
    #[error("At least one split is required")]
    Empty,

    /// An entry had a blank person name.
    #[error("Split {index}: person name is required")]
    BlankPersonName {
        /// 1-based position of the entry.
        index: usize,
    },

    /// A percentage entry was missing its value.
    #[error("Split {index}: percentage value is required")]
    MissingPercentage {
        /// 1-based position of the entry.
        index: usize,
    },

    /// A percentage entry's value was outside (0, 100].
    #[error("Split {index}: percentage must be between 0 and 100")]
    PercentageOutOfRange {
        /// 1-based position of the entry.
        index: usize,
        /// The declared percentage.
        value: Decimal,
    },

    /// An exact entry was missing its value.
    #[error("Split {index}: exact amount is required")]
    MissingExactAmount {
        /// 1-based position of the entry.
        index: usize,
    },

    /// An exact entry's value was zero or negative.
    #[error("Split {index}: exact amount must be positive")]
    NonPositiveExactAmount {
        /// 1-based position of the entry.
        index: usize,
        /// The declared amount.
        value: Decimal,
    },

    /// An exact entry's value exceeded the expense total.
    #[error("Split {index}: exact amount cannot exceed total expense amount")]
    ExactExceedsTotal {
        /// 1-based position of the entry.
        index: usize,
        /// The declared amount.
        value: Decimal,
    },

    /// An equal entry carried a declared value.
    #[error("Split {index}: equal splits do not take a value")]
    UnexpectedValue {
        /// 1-based position of the entry.
        index: usize,
    },

    /// Percentage values summed past 100.
    #[error("Total percentage ({total}%) cannot exceed 100%")]
    PercentageSumExceeded {
        /// Sum of all declared percentages.
        total: Decimal,
    },

    /// Exact values summed past the expense total.
    #[error("Total exact amounts ({total}) cannot exceed total expense amount ({expense_total})")]
    ExactSumExceeded {
        /// Sum of all declared exact amounts.
        total: Decimal,
        /// The expense total.
        expense_total: Decimal,
    },

    /// Declared shares left a negative remainder for the equal entries.
    #[error("Not enough amount remaining for equal splits after percentage and exact amounts")]
    NegativeRemainder,

    /// With no equal entries, the declared shares did not cover the total.
    #[error("Splits must add up to 100% of the expense amount")]
    Unreconciled {
        /// Amount left uncovered (may be negative for over-coverage).
        remaining: Decimal,
    },
}

/// Validates a split specification against an expense total.
///
/// Returns every violation found, in input order, with list-level checks
/// last. An empty vector means the specification is valid. Pure; never
/// mutates anything.
#[must_use]
pub fn validate_splits(specs: &[SplitSpec], total: Decimal) -> Vec<SplitViolation> {
    let mut violations = Vec::new();

    if specs.is_empty() {
        violations.push(SplitViolation::Empty);
        return violations;
    }

    let mut total_percentage = Decimal::ZERO;
    let mut total_exact = Decimal::ZERO;
    let mut equal_count = 0usize;

    for (i, spec) in specs.iter().enumerate() {
        let index = i + 1;

        if spec.person_name.trim().is_empty() {
            violations.push(SplitViolation::BlankPersonName { index });
        }

        match spec.kind {
            SplitKind::Percentage => match spec.value {
                None => violations.push(SplitViolation::MissingPercentage { index }),
                Some(value) => {
                    if value <= Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                        violations.push(SplitViolation::PercentageOutOfRange { index, value });
                    } else {
                        total_percentage += value;
                    }
                }
            },
            SplitKind::Exact => match spec.value {
                None => violations.push(SplitViolation::MissingExactAmount { index }),
                Some(value) => {
                    if value <= Decimal::ZERO {
                        violations.push(SplitViolation::NonPositiveExactAmount { index, value });
                    } else if value > total {
                        violations.push(SplitViolation::ExactExceedsTotal { index, value });
                    } else {
                        total_exact += value;
                    }
                }
            },
            SplitKind::Equal => {
                if spec.value.is_some() {
                    violations.push(SplitViolation::UnexpectedValue { index });
                }
                equal_count += 1;
            }
        }
    }

    if total_percentage > Decimal::ONE_HUNDRED {
        violations.push(SplitViolation::PercentageSumExceeded {
            total: total_percentage,
        });
    }

    if total_exact > total {
        violations.push(SplitViolation::ExactSumExceeded {
            total: total_exact,
            expense_total: total,
        });
    }

    let remaining = total - total_exact - total * total_percentage / Decimal::ONE_HUNDRED;
    if equal_count > 0 {
        if remaining < Decimal::ZERO {
            violations.push(SplitViolation::NegativeRemainder);
        }
    } else if remaining.abs() > SETTLEMENT_TOLERANCE {
        violations.push(SplitViolation::Unreconciled { remaining });
    }

    violations
}
