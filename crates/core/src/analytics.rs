//! Read-only summaries over an expense snapshot.
//!
//! These are pure folds: they never touch storage and never mutate. Callers
//! pass a consistent snapshot (usually `ExpenseStore::all`) and get
//! serializable report types back. Percentages are `round_dp(2)`; the
//! underlying totals stay unrounded.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expense::{Category, ExpenseRecord};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One category's slice of total spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// The category.
    pub category: Category,
    /// Summed expense amounts in this category.
    pub total: Decimal,
    /// Number of expenses in this category.
    pub count: usize,
    /// Share of overall spending, as a percentage rounded to 2 decimals.
    pub share: Decimal,
}

/// One calendar month's spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// Month number, 1 through 12.
    pub month: u32,
    /// English month name.
    pub name: String,
    /// Summed expense amounts in this month.
    pub total: Decimal,
    /// Number of expenses in this month.
    pub count: usize,
}

/// A whole year, month by month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The year summarized.
    pub year: i32,
    /// Twelve buckets, January first, zeroed where nothing was spent.
    pub months: Vec<MonthBucket>,
    /// Year total.
    pub total: Decimal,
}

/// One payer's spending profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    /// Payer name.
    pub name: String,
    /// Total this person paid.
    pub total: Decimal,
    /// Number of expenses this person paid for.
    pub count: usize,
    /// Mean expense amount, rounded to 2 decimals.
    pub average: Decimal,
    /// Share of overall spending, as a percentage rounded to 2 decimals.
    pub share: Decimal,
    /// Up to three categories this person spends the most on, with totals,
    /// largest first.
    pub top_categories: Vec<(Category, Decimal)>,
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

/// Spending per category, largest first. Ties break by category name so
/// the report is stable.
#[must_use]
pub fn category_breakdown(expenses: &[ExpenseRecord]) -> Vec<CategoryBreakdown> {
    let grand_total: Decimal = expenses.iter().map(|e| e.amount).sum();

    let mut per_category: HashMap<Category, (Decimal, usize)> = HashMap::new();
    for expense in expenses {
        let entry = per_category.entry(expense.category).or_default();
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut breakdown: Vec<CategoryBreakdown> = per_category
        .into_iter()
        .map(|(category, (total, count))| CategoryBreakdown {
            category,
            total,
            count,
            share: percentage(total, grand_total),
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.to_string().cmp(&b.category.to_string()))
    });
    breakdown
}

/// Month-by-month spending for one calendar year. Always returns twelve
/// buckets.
#[must_use]
pub fn monthly_summary(expenses: &[ExpenseRecord], year: i32) -> MonthlySummary {
    let mut months: Vec<MonthBucket> = (1..=12)
        .map(|month| MonthBucket {
            month,
            name: MONTH_NAMES[month as usize - 1].to_string(),
            total: Decimal::ZERO,
            count: 0,
        })
        .collect();

    for expense in expenses {
        let date = expense.created_at.date_naive();
        if date.year() != year {
            continue;
        }
        let bucket = &mut months[date.month() as usize - 1];
        bucket.total += expense.amount;
        bucket.count += 1;
    }

    let total = months.iter().map(|m| m.total).sum();
    MonthlySummary {
        year,
        months,
        total,
    }
}

/// Per-payer spending profiles, biggest spender first. Ties break by name.
#[must_use]
pub fn people_summary(expenses: &[ExpenseRecord]) -> Vec<PersonSummary> {
    let grand_total: Decimal = expenses.iter().map(|e| e.amount).sum();

    let mut per_person: HashMap<&str, (Decimal, usize, HashMap<Category, Decimal>)> =
        HashMap::new();
    for expense in expenses {
        let entry = per_person.entry(expense.paid_by.as_str()).or_default();
        entry.0 += expense.amount;
        entry.1 += 1;
        *entry.2.entry(expense.category).or_default() += expense.amount;
    }

    let mut summaries: Vec<PersonSummary> = per_person
        .into_iter()
        .map(|(name, (total, count, categories))| {
            let mut top_categories: Vec<(Category, Decimal)> = categories.into_iter().collect();
            top_categories.sort_by(|a, b| {
                b.1.cmp(&a.1)
                    .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
            });
            top_categories.truncate(3);

            let average = (total / Decimal::from(count as u64)).round_dp(2);
            PersonSummary {
                name: name.to_string(),
                total,
                count,
                average,
                share: percentage(total, grand_total),
                top_categories,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    summaries
}
