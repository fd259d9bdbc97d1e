//! Seeds sample data into an in-memory store and prints the ledger reports.
//!
//! Usage: cargo run --bin demo

use chrono::{Datelike, Months, Utc};
use rust_decimal_macros::dec;

use divvy_core::analytics::{category_breakdown, monthly_summary, people_summary};
use divvy_core::expense::{Category, ExpenseDraft, ExpenseService};
use divvy_core::recurring::{NewTemplate, RecurrenceRule, RecurringService};
use divvy_core::split::SplitSpec;
use divvy_core::store::{ExpenseFilter, ExpenseStore, PersonDirectory};
use divvy_store::MemoryStore;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = MemoryStore::new();
    seed(&store)?;

    let service = ExpenseService::new(&store);

    println!("=== Expenses ===");
    for expense in service.expenses(&ExpenseFilter::default())? {
        println!(
            "  {} | {:<30} | {:>10} | paid by {}",
            expense.created_at.date_naive(),
            expense.description,
            expense.amount,
            expense.paid_by,
        );
    }

    println!("\n=== Balances ===");
    for (name, balance) in service.balances()? {
        println!(
            "  {name:<10} paid {:>10}  owes {:>10}  net {:>10}  ({:?})",
            balance.paid, balance.owed, balance.balance, balance.status,
        );
    }

    println!("\n=== Settlements ===");
    for settlement in service.settlements()? {
        println!(
            "  {} pays {} to {}",
            settlement.from, settlement.amount, settlement.to
        );
    }

    let snapshot = store.all()?;

    println!("\n=== Spending by category ===");
    for slice in category_breakdown(&snapshot) {
        println!(
            "  {:<15} {:>10}  ({} expenses, {}%)",
            slice.category.to_string(),
            slice.total,
            slice.count,
            slice.share,
        );
    }

    let year = Utc::now().year();
    println!("\n=== {year} month by month ===");
    let summary = monthly_summary(&snapshot, year);
    for bucket in summary.months.iter().filter(|m| m.count > 0) {
        println!(
            "  {:<10} {:>10}  ({} expenses)",
            bucket.name, bucket.total, bucket.count
        );
    }
    println!("  year total: {}", summary.total);

    println!("\n=== Who spends what ===");
    for person in people_summary(&snapshot) {
        let top: Vec<String> = person
            .top_categories
            .iter()
            .map(|(category, total)| format!("{category} {total}"))
            .collect();
        println!(
            "  {:<10} total {:>10}  avg {:>8}  share {:>6}%  top: {}",
            person.name,
            person.total,
            person.average,
            person.share,
            top.join(", "),
        );
    }

    Ok(())
}

/// Seeds three flatmates, a handful of expenses, and a monthly rent
/// template that started three months ago.
fn seed(store: &MemoryStore) -> anyhow::Result<()> {
    // Register everyone up front so equal splits span the whole group.
    for name in ["Shantanu", "Sanket", "Om"] {
        store.get_or_create(name)?;
    }

    let service = ExpenseService::new(store);

    let expenses = [
        ("Dinner at local restaurant", dec!(600), "Shantanu", Category::Food),
        ("Weekly groceries", dec!(450), "Sanket", Category::Food),
        ("Petrol for road trip", dec!(500), "Om", Category::Travel),
        ("Movie tickets", dec!(800), "Shantanu", Category::Entertainment),
        ("Pizza night", dec!(280), "Sanket", Category::Food),
        ("Electricity bill", dec!(1200), "Om", Category::Utilities),
        ("Internet bill", dec!(799), "Shantanu", Category::Utilities),
    ];
    for (description, amount, paid_by, category) in expenses {
        service.create_expense(&ExpenseDraft {
            amount,
            description: description.to_string(),
            paid_by: paid_by.to_string(),
            category,
            splits: None,
        })?;
    }

    // One custom split: Om had guests over, so he covers 60%.
    service.create_expense(&ExpenseDraft {
        amount: dec!(900),
        description: "Birthday cake and snacks".to_string(),
        paid_by: "Om".to_string(),
        category: Category::Food,
        splits: Some(vec![
            SplitSpec::percentage("Om", dec!(60)),
            SplitSpec::equal("Shantanu"),
            SplitSpec::equal("Sanket"),
        ]),
    })?;

    let start = Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(3))
        .ok_or_else(|| anyhow::anyhow!("date out of range"))?;
    RecurringService::new(store).create_template(NewTemplate {
        amount: dec!(15000),
        description: "Monthly Rent".to_string(),
        paid_by: "Shantanu".to_string(),
        category: Category::Utilities,
        rule: RecurrenceRule::Monthly,
        start_date: start,
        end_date: None,
    })?;

    tracing::info!("sample data seeded");
    Ok(())
}
