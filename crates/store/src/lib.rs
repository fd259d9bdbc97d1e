//! In-memory storage backend for Divvy.
//!
//! [`MemoryStore`] implements every storage trait the core consumes, backed
//! by a single `RwLock`. Multi-step writes (an expense with its splits, an
//! expansion with its cursor advance) happen under one write guard, so
//! readers always see a consistent snapshot and the optimistic version
//! check on templates actually detects concurrent expansions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use divvy_core::expense::{ExpenseRecord, NewExpense};
use divvy_core::recurring::{NewTemplate, RecurringTemplate};
use divvy_core::store::{
    ExpenseFilter, ExpenseStore, Person, PersonDirectory, RecurringStore, StoreError,
};
use divvy_shared::types::{ExpenseId, PersonId, TemplateId};

#[derive(Default)]
struct Inner {
    expenses: Vec<ExpenseRecord>,
    people: BTreeMap<String, Person>,
    templates: Vec<RecurringTemplate>,
}

impl Inner {
    /// Registers everyone an expense names, payer and split participants
    /// alike. Runs inside the same write guard as the expense mutation.
    fn register_participants(&mut self, expense: &NewExpense) {
        self.register(&expense.paid_by);
        for split in &expense.splits {
            self.register(&split.person_name);
        }
    }

    fn register(&mut self, name: &str) -> Person {
        self.people
            .entry(name.to_string())
            .or_insert_with(|| Person {
                id: PersonId::new(),
                name: name.to_string(),
                created_at: Utc::now(),
            })
            .clone()
    }

    fn insert_expense(&mut self, expense: NewExpense) -> ExpenseId {
        self.register_participants(&expense);
        let id = ExpenseId::new();
        self.expenses.push(ExpenseRecord {
            id,
            amount: expense.amount,
            description: expense.description,
            paid_by: expense.paid_by,
            category: expense.category,
            created_at: expense.created_at,
            updated_at: expense.created_at,
            template_id: expense.template_id,
            splits: expense.splits,
        });
        id
    }

    /// Swaps in the caller's template if its version still matches,
    /// bumping the stored version.
    fn checked_replace_template(&mut self, template: &RecurringTemplate) -> Result<(), StoreError> {
        let stored = self
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or(StoreError::TemplateNotFound(template.id))?;
        if stored.version != template.version {
            tracing::debug!(
                template_id = %template.id,
                stored = stored.version,
                given = template.version,
                "template version mismatch"
            );
            return Err(StoreError::Conflict);
        }
        *stored = template.clone();
        stored.version += 1;
        Ok(())
    }
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Internal("store lock poisoned".to_string()))
    }
}

impl ExpenseStore for MemoryStore {
    fn append(&self, expense: NewExpense) -> Result<ExpenseId, StoreError> {
        Ok(self.write()?.insert_expense(expense))
    }

    fn get(&self, id: ExpenseId) -> Result<ExpenseRecord, StoreError> {
        self.read()?
            .expenses
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(StoreError::ExpenseNotFound(id))
    }

    fn query(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRecord>, StoreError> {
        let inner = self.read()?;
        let mut matching: Vec<ExpenseRecord> = inner
            .expenses
            .iter()
            .filter(|e| filter.category.is_none_or(|c| e.category == c))
            .filter(|e| filter.paid_by.as_deref().is_none_or(|p| e.paid_by == p))
            .filter(|e| filter.from.is_none_or(|from| e.created_at >= from))
            .filter(|e| filter.to.is_none_or(|to| e.created_at <= to))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    fn all(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        Ok(self.read()?.expenses.clone())
    }

    fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner.register_participants(&expense);
        let existing = inner
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::ExpenseNotFound(id))?;
        *existing = ExpenseRecord {
            id,
            amount: expense.amount,
            description: expense.description,
            paid_by: expense.paid_by,
            category: expense.category,
            created_at: expense.created_at,
            updated_at: Utc::now(),
            template_id: expense.template_id,
            splits: expense.splits,
        };
        Ok(())
    }

    fn delete(&self, id: ExpenseId) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let before = inner.expenses.len();
        inner.expenses.retain(|e| e.id != id);
        if inner.expenses.len() == before {
            return Err(StoreError::ExpenseNotFound(id));
        }
        Ok(())
    }
}

impl PersonDirectory for MemoryStore {
    fn get_or_create(&self, name: &str) -> Result<Person, StoreError> {
        Ok(self.write()?.register(name))
    }

    fn people(&self) -> Result<Vec<Person>, StoreError> {
        // BTreeMap iteration already yields name order.
        Ok(self.read()?.people.values().cloned().collect())
    }
}

impl RecurringStore for MemoryStore {
    fn create_template(&self, draft: NewTemplate) -> Result<TemplateId, StoreError> {
        let mut inner = self.write()?;
        inner.register(&draft.paid_by);
        let id = TemplateId::new();
        inner.templates.push(RecurringTemplate {
            id,
            amount: draft.amount,
            description: draft.description,
            paid_by: draft.paid_by,
            category: draft.category,
            rule: draft.rule,
            start_date: draft.start_date,
            end_date: draft.end_date,
            last_generated: None,
            is_active: true,
            version: 1,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn template(&self, id: TemplateId) -> Result<RecurringTemplate, StoreError> {
        self.read()?
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::TemplateNotFound(id))
    }

    fn list_active(&self) -> Result<Vec<RecurringTemplate>, StoreError> {
        Ok(self
            .read()?
            .templates
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }

    fn persist(&self, template: &RecurringTemplate) -> Result<(), StoreError> {
        self.write()?.checked_replace_template(template)
    }

    fn commit_expansion(
        &self,
        template: &RecurringTemplate,
        occurrences: Vec<NewExpense>,
    ) -> Result<Vec<ExpenseId>, StoreError> {
        // One guard for the whole commit: the version check, the cursor
        // advance, and every occurrence land together or not at all.
        let mut inner = self.write()?;
        inner.checked_replace_template(template)?;
        Ok(occurrences
            .into_iter()
            .map(|occurrence| inner.insert_expense(occurrence))
            .collect())
    }
}
