//! Domain types for split specifications.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a person's share of an expense is determined.
///
/// Unknown kind strings are rejected at the serde boundary; inside the core
/// the enum is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    /// Share computed from the remainder after percentage and exact shares.
    Equal,
    /// Share is `value`% of the expense total. Value must lie in (0, 100].
    Percentage,
    /// Share is `value` currency units. Value must lie in (0, total].
    Exact,
}

impl std::fmt::Display for SplitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Percentage => write!(f, "percentage"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

/// A proposed split entry, as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSpec {
    /// Display name of the person taking this share.
    pub person_name: String,
    /// How the share is determined.
    pub kind: SplitKind,
    /// Declared percentage or exact amount. `None` for equal splits.
    pub value: Option<Decimal>,
}

impl SplitSpec {
    /// Convenience constructor for an equal split.
    #[must_use]
    pub fn equal(person_name: impl Into<String>) -> Self {
        Self {
            person_name: person_name.into(),
            kind: SplitKind::Equal,
            value: None,
        }
    }

    /// Convenience constructor for a percentage split.
    #[must_use]
    pub fn percentage(person_name: impl Into<String>, value: Decimal) -> Self {
        Self {
            person_name: person_name.into(),
            kind: SplitKind::Percentage,
            value: Some(value),
        }
    }

    /// Convenience constructor for an exact-amount split.
    #[must_use]
    pub fn exact(person_name: impl Into<String>, value: Decimal) -> Self {
        Self {
            person_name: person_name.into(),
            kind: SplitKind::Exact,
            value: Some(value),
        }
    }
}

/// A split entry with its resolved monetary share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedSplit {
    /// Display name of the person taking this share.
    pub person_name: String,
    /// How the share was determined.
    pub kind: SplitKind,
    /// The declared value the share was derived from, if any.
    pub value: Option<Decimal>,
    /// The finalized amount this person owes for the expense.
    pub calculated_amount: Decimal,
}
