//! Recurring-expense templates and their expansion.
//!
//! A template describes an expense that repeats weekly, monthly, or yearly.
//! Expansion is lazy and demand-driven: before any ledger read, the service
//! walks each active template's cursor forward and materializes every missed
//! occurrence as an ordinary expense. Expansion is idempotent; the cursor
//! and the generated occurrences are committed atomically with an
//! optimistic version check so concurrent triggers never double-generate.

pub mod expander;
pub mod service;
pub mod types;

pub use expander::{Expansion, expand_template};
pub use service::{RecurringError, RecurringService};
pub use types::{NewTemplate, RecurrenceRule, RecurringTemplate, TemplateViolation};
