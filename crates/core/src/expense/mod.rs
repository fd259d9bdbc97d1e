//! Expense domain types and the expense service.

pub mod service;
pub mod types;
pub mod validation;

pub use service::{ExpenseError, ExpenseService};
pub use types::{Category, ExpenseDraft, ExpenseRecord, NewExpense, SplitEntry};
pub use validation::{ExpenseViolation, validate_draft};
