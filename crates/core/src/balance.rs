//! Per-person paid/owed/balance aggregation.
//!
//! Folds the complete expense history into one net position per person.
//! Expenses without splits (legacy expenses) are divided equally across
//! every person seen anywhere in the input set, not just the parties of
//! that expense. That global fallback is part of the observable contract.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_shared::types::{is_settled, round_to_cents};

use crate::expense::ExpenseRecord;

/// A person's net position relative to the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    /// The group owes this person money (positive balance).
    Owed,
    /// This person owes the group money (negative balance).
    Owes,
    /// Zero within tolerance.
    Settled,
}

/// Paid/owed accumulators and the derived net balance for one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonBalance {
    /// Total this person paid out for the group.
    pub paid: Decimal,
    /// Total of this person's shares across all expenses.
    pub owed: Decimal,
    /// `paid - owed`.
    pub balance: Decimal,
    /// Sign of the balance, with tolerance applied.
    pub status: BalanceStatus,
}

impl PersonBalance {
    /// The legacy fallback divides by the roster size, so the accumulated
    /// `owed` can carry sub-cent digits. It is rounded to cents here, once,
    /// before the balance is derived.
    fn from_accumulators(paid: Decimal, owed: Decimal) -> Self {
        let owed = round_to_cents(owed);
        let balance = paid - owed;
        let status = if is_settled(balance) {
            BalanceStatus::Settled
        } else if balance > Decimal::ZERO {
            BalanceStatus::Owed
        } else {
            BalanceStatus::Owes
        };
        Self {
            paid,
            owed,
            balance,
            status,
        }
    }
}

/// Computes each person's paid/owed/balance from a consistent snapshot of
/// the expense set.
///
/// The result is keyed by person name and independent of the input's
/// iteration order: decimal addition is associative and commutative, and
/// the map ordering is by name.
#[must_use]
pub fn compute_balances(expenses: &[ExpenseRecord]) -> BTreeMap<String, PersonBalance> {
    if expenses.is_empty() {
        return BTreeMap::new();
    }

    // Everyone appearing as payer or split participant anywhere in the set.
    // Legacy expenses are split across this whole roster.
    let roster: BTreeSet<&str> = expenses
        .iter()
        .flat_map(|e| {
            std::iter::once(e.paid_by.as_str())
                .chain(e.splits.iter().map(|s| s.person_name.as_str()))
        })
        .collect();

    let mut paid: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut owed: BTreeMap<&str, Decimal> = BTreeMap::new();

    for expense in expenses {
        *paid.entry(expense.paid_by.as_str()).or_default() += expense.amount;

        if expense.splits.is_empty() {
            let share = expense.amount / Decimal::from(roster.len() as u64);
            for person in &roster {
                *owed.entry(person).or_default() += share;
            }
        } else {
            for split in &expense.splits {
                *owed.entry(split.person_name.as_str()).or_default() += split.calculated_amount;
            }
        }
    }

    roster
        .into_iter()
        .map(|person| {
            let paid = paid.get(person).copied().unwrap_or_default();
            let owed = owed.get(person).copied().unwrap_or_default();
            (person.to_string(), PersonBalance::from_accumulators(paid, owed))
        })
        .collect()
}
