//! Recurring template types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use divvy_shared::types::TemplateId;

use crate::expense::Category;

/// How often a template produces an occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    /// Every 7 days.
    Weekly,
    /// Same day next month, clamped to the last valid day of shorter
    /// months.
    Monthly,
    /// Same month and day next year (Feb 29 clamps to Feb 28).
    Yearly,
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// A recurring-expense template.
///
/// `last_generated` is the generation cursor: the date of the most recently
/// materialized occurrence, `None` until the first expansion. It is
/// monotonically non-decreasing and never exceeds
/// `min(today, end_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    /// Unique identifier.
    pub id: TemplateId,
    /// Positive amount copied onto each occurrence.
    pub amount: Decimal,
    /// Description copied onto each occurrence.
    pub description: String,
    /// Payer copied onto each occurrence.
    pub paid_by: String,
    /// Category copied onto each occurrence.
    pub category: Category,
    /// How often occurrences are produced.
    pub rule: RecurrenceRule,
    /// Anchor date; the first occurrence falls one rule-step after it.
    pub start_date: NaiveDate,
    /// Last date an occurrence may fall on, inclusive.
    pub end_date: Option<NaiveDate>,
    /// Generation cursor.
    pub last_generated: Option<NaiveDate>,
    /// Inactive templates are never expanded.
    pub is_active: bool,
    /// Optimistic-concurrency version, bumped on every persisted change.
    pub version: i64,
    /// When the template was created.
    pub created_at: DateTime<Utc>,
}

/// Client input for creating a template.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTemplate {
    /// Positive amount.
    pub amount: Decimal,
    /// Description. Must not be blank.
    pub description: String,
    /// Payer. Must not be blank.
    pub paid_by: String,
    /// Category tag.
    #[serde(default)]
    pub category: Category,
    /// Recurrence rule.
    pub rule: RecurrenceRule,
    /// Anchor date.
    pub start_date: NaiveDate,
    /// Optional last occurrence date, inclusive.
    pub end_date: Option<NaiveDate>,
}

/// A single violation found in a template draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateViolation {
    /// Amount was zero or negative.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Description was blank.
    #[error("Description is required")]
    BlankDescription,

    /// Payer name was blank.
    #[error("Paid by is required")]
    BlankPayer,

    /// End date preceded the start date.
    #[error("End date must not be before start date")]
    EndBeforeStart,
}

impl NewTemplate {
    /// Validates the draft, accumulating every violation.
    #[must_use]
    pub fn validate(&self) -> Vec<TemplateViolation> {
        let mut violations = Vec::new();

        if self.amount <= Decimal::ZERO {
            violations.push(TemplateViolation::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            violations.push(TemplateViolation::BlankDescription);
        }
        if self.paid_by.trim().is_empty() {
            violations.push(TemplateViolation::BlankPayer);
        }
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            violations.push(TemplateViolation::EndBeforeStart);
        }

        violations
    }
}
