//! Greedy debt-simplification planning.
//!
//! Collapses the balance map into a small sequence of pairwise transfers
//! that zero every balance. This is a greedy two-pointer heuristic, not an
//! optimal min-cost-flow solver: it produces at most
//! `debtors + creditors - 1` transfers, which is small but not guaranteed
//! globally minimal.
//!
//! Both partitions are sorted by descending magnitude with ties broken by
//! name, so the plan is reproducible for identical balances.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::balance::PersonBalance;

/// A single directed transfer from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Who pays.
    pub from: String,
    /// Who receives.
    pub to: String,
    /// Transfer amount, always positive.
    pub amount: Decimal,
}

/// Plans transfers that drive every balance to zero within tolerance.
///
/// Every nonzero balance participates, one-cent debts included; only
/// exactly-zero balances are excluded. The sum of the planned amounts
/// equals the lesser of the positive and negative totals, so for a
/// zero-sum ledger applying the plan zeroes every balance exactly.
#[must_use]
pub fn plan_settlements(balances: &BTreeMap<String, PersonBalance>) -> Vec<Settlement> {
    let mut debtors: Vec<(String, Decimal)> = Vec::new();
    let mut creditors: Vec<(String, Decimal)> = Vec::new();

    for (name, person) in balances {
        match person.balance.cmp(&Decimal::ZERO) {
            Ordering::Less => debtors.push((name.clone(), -person.balance)),
            Ordering::Greater => creditors.push((name.clone(), person.balance)),
            Ordering::Equal => {}
        }
    }

    // Descending magnitude, ties by name. The ordering is a documented
    // contract, not an accident of map iteration.
    let by_magnitude =
        |a: &(String, Decimal), b: &(String, Decimal)| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0));
    debtors.sort_by(by_magnitude);
    creditors.sort_by(by_magnitude);

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let amount = debtors[i].1.min(creditors[j].1);

        settlements.push(Settlement {
            from: debtors[i].0.clone(),
            to: creditors[j].0.clone(),
            amount,
        });

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;

        if debtors[i].1.is_zero() {
            i += 1;
        }
        if creditors[j].1.is_zero() {
            j += 1;
        }
    }

    settlements
}
