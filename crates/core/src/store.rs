//! Collaborator interfaces for persistence.
//!
//! The core never talks to a database directly. It consumes these traits,
//! which a storage crate implements. Two contracts matter to correctness:
//!
//! - [`ExpenseStore::append`] persists an expense together with all of its
//!   splits as one atomic unit; readers never observe a half-written
//!   expense.
//! - [`RecurringStore::commit_expansion`] persists generated occurrences and
//!   the advanced cursor atomically, rejecting the write with
//!   [`StoreError::Conflict`] when the template version moved underneath the
//!   caller.

use chrono::{DateTime, Utc};
use thiserror::Error;

use divvy_shared::types::{ExpenseId, PersonId, TemplateId};

use crate::expense::{Category, ExpenseRecord, NewExpense};
use crate::recurring::{NewTemplate, RecurringTemplate};

/// A person known to the system. Created on first reference.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub id: PersonId,
    /// Unique display name.
    pub name: String,
    /// When this person was first referenced.
    pub created_at: DateTime<Utc>,
}

/// Filter for expense queries. All fields are conjunctive; `None` matches
/// everything.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Only expenses in this category.
    pub category: Option<Category>,
    /// Only expenses paid by this person.
    pub paid_by: Option<String>,
    /// Only expenses created at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only expenses created at or before this instant.
    pub to: Option<DateTime<Utc>>,
}

/// Errors surfaced by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Reference to an unknown expense.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Reference to an unknown recurring template.
    #[error("Recurring template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// The entity was modified concurrently; re-read and retry.
    #[error("Concurrent modification detected, please retry")]
    Conflict,

    /// Implementation-specific failure.
    #[error("Store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns true if the operation may succeed when retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

/// Persistence of expenses and their splits.
pub trait ExpenseStore {
    /// Persists an expense with all of its splits atomically.
    fn append(&self, expense: NewExpense) -> Result<ExpenseId, StoreError>;

    /// Fetches a single expense.
    fn get(&self, id: ExpenseId) -> Result<ExpenseRecord, StoreError>;

    /// Returns matching expenses, newest first.
    fn query(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRecord>, StoreError>;

    /// Returns the complete expense set as one consistent snapshot.
    fn all(&self) -> Result<Vec<ExpenseRecord>, StoreError>;

    /// Replaces an expense and its splits atomically, keeping the original
    /// creation timestamp.
    fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), StoreError>;

    /// Deletes an expense and its splits.
    fn delete(&self, id: ExpenseId) -> Result<(), StoreError>;
}

/// Name-keyed person registry.
pub trait PersonDirectory {
    /// Returns the person with this name, creating them on first reference.
    /// Idempotent.
    fn get_or_create(&self, name: &str) -> Result<Person, StoreError>;

    /// All known people, ordered by name.
    fn people(&self) -> Result<Vec<Person>, StoreError>;
}

/// Persistence of recurring templates.
pub trait RecurringStore {
    /// Persists a new template.
    fn create_template(&self, template: NewTemplate) -> Result<TemplateId, StoreError>;

    /// Fetches a single template.
    fn template(&self, id: TemplateId) -> Result<RecurringTemplate, StoreError>;

    /// All active templates.
    fn list_active(&self) -> Result<Vec<RecurringTemplate>, StoreError>;

    /// Durably updates a template's cursor, flags, and fields. Fails with
    /// [`StoreError::Conflict`] if the stored version differs from the one
    /// the template was read at.
    fn persist(&self, template: &RecurringTemplate) -> Result<(), StoreError>;

    /// Atomically persists generated occurrences together with the advanced
    /// template. Version-checked like [`RecurringStore::persist`]; on
    /// conflict nothing is written.
    fn commit_expansion(
        &self,
        template: &RecurringTemplate,
        occurrences: Vec<NewExpense>,
    ) -> Result<Vec<ExpenseId>, StoreError>;
}
