//! Expense domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{ExpenseId, TemplateId};

use crate::split::{FinalizedSplit, SplitKind, SplitSpec};

/// Expense category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// Food and dining.
    Food,
    /// Travel and transport.
    Travel,
    /// Utilities and bills.
    Utilities,
    /// Entertainment.
    Entertainment,
    /// Anything else.
    #[default]
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Food => write!(f, "Food"),
            Self::Travel => write!(f, "Travel"),
            Self::Utilities => write!(f, "Utilities"),
            Self::Entertainment => write!(f, "Entertainment"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Self::Food),
            "Travel" => Ok(Self::Travel),
            "Utilities" => Ok(Self::Utilities),
            "Entertainment" => Ok(Self::Entertainment),
            "Other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {s}")),
        }
    }
}

/// A persisted split: who owes what for one expense.
///
/// Invariant: for a given expense, the calculated amounts of its splits sum
/// to the expense amount within one cent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEntry {
    /// Display name of the person taking this share.
    pub person_name: String,
    /// How the share was determined.
    pub kind: SplitKind,
    /// Declared percentage or exact amount, if any.
    pub value: Option<Decimal>,
    /// The finalized amount this person owes.
    pub calculated_amount: Decimal,
}

impl From<FinalizedSplit> for SplitEntry {
    fn from(split: FinalizedSplit) -> Self {
        Self {
            person_name: split.person_name,
            kind: split.kind,
            value: split.value,
            calculated_amount: split.calculated_amount,
        }
    }
}

/// A persisted expense with its splits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Unique identifier.
    pub id: ExpenseId,
    /// Positive expense amount.
    pub amount: Decimal,
    /// What the expense was for.
    pub description: String,
    /// Display name of the person who paid.
    pub paid_by: String,
    /// Category tag.
    pub category: Category,
    /// When the expense occurred.
    pub created_at: DateTime<Utc>,
    /// When the expense was last edited.
    pub updated_at: DateTime<Utc>,
    /// The recurring template that generated this expense, if any.
    pub template_id: Option<TemplateId>,
    /// Owned splits. An empty vector marks a legacy expense, resolved via
    /// the global equal-share fallback during aggregation.
    pub splits: Vec<SplitEntry>,
}

/// An expense ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// Positive expense amount.
    pub amount: Decimal,
    /// What the expense was for.
    pub description: String,
    /// Display name of the person who paid.
    pub paid_by: String,
    /// Category tag.
    pub category: Category,
    /// When the expense occurred.
    pub created_at: DateTime<Utc>,
    /// The recurring template that generated this expense, if any.
    pub template_id: Option<TemplateId>,
    /// Finalized splits, persisted atomically with the expense.
    pub splits: Vec<SplitEntry>,
}

/// Client input for creating or updating an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseDraft {
    /// Expense amount. Must be positive.
    pub amount: Decimal,
    /// What the expense was for. Must not be blank.
    pub description: String,
    /// Who paid. Must not be blank.
    pub paid_by: String,
    /// Category tag.
    #[serde(default)]
    pub category: Category,
    /// Proposed splits. Absent or empty means "split equally among
    /// everyone".
    #[serde(default)]
    pub splits: Option<Vec<SplitSpec>>,
}

impl ExpenseDraft {
    /// Returns the proposed splits if any were actually given.
    #[must_use]
    pub fn custom_splits(&self) -> Option<&[SplitSpec]> {
        match self.splits.as_deref() {
            Some([]) | None => None,
            Some(specs) => Some(specs),
        }
    }
}
