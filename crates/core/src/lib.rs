//! Core business logic for Divvy.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `split` - Split specification validation and share calculation
//! - `balance` - Per-person paid/owed/balance aggregation
//! - `settlement` - Greedy debt-simplification planning
//! - `recurring` - Recurring-expense template expansion
//! - `expense` - Expense domain types and the expense service
//! - `analytics` - Spending summaries by category, month, and person
//! - `store` - Collaborator interfaces for persistence

pub mod analytics;
pub mod balance;
pub mod expense;
pub mod recurring;
pub mod settlement;
pub mod split;
pub mod store;
