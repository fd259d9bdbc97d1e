//! Validation for expense drafts.
//!
//! Same accumulate-everything contract as split validation: the caller gets
//! all problems at once, and nothing has been persisted when violations are
//! reported.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::split::{SplitViolation, validate_splits};

use super::types::ExpenseDraft;

/// A single violation found in an expense draft.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpenseViolation {
    /// Amount was zero or negative.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Description was blank.
    #[error("Description is required")]
    BlankDescription,

    /// Payer name was blank.
    #[error("Paid by is required")]
    BlankPayer,

    /// A problem inside the proposed splits.
    #[error(transparent)]
    Split(#[from] SplitViolation),
}

/// Validates an expense draft, including its proposed splits when present.
#[must_use]
pub fn validate_draft(draft: &ExpenseDraft) -> Vec<ExpenseViolation> {
    let mut violations = Vec::new();

    if draft.amount <= Decimal::ZERO {
        violations.push(ExpenseViolation::NonPositiveAmount);
    }
    if draft.description.trim().is_empty() {
        violations.push(ExpenseViolation::BlankDescription);
    }
    if draft.paid_by.trim().is_empty() {
        violations.push(ExpenseViolation::BlankPayer);
    }

    if let Some(specs) = draft.custom_splits() {
        violations.extend(
            validate_splits(specs, draft.amount)
                .into_iter()
                .map(ExpenseViolation::Split),
        );
    }

    violations
}
