//! Expense orchestration: validation, split resolution, persistence, and
//! the derived ledger reads.
//!
//! Every read path (`expenses`, `balances`, `settlements`) first expands any
//! due recurring templates, so callers always see a ledger that includes
//! every occurrence up to today.

use std::collections::BTreeMap;

use chrono::Utc;
use thiserror::Error;

use divvy_shared::types::ExpenseId;

use crate::balance::{PersonBalance, compute_balances};
use crate::recurring::RecurringService;
use crate::settlement::{Settlement, plan_settlements};
use crate::split::{SplitSpec, calculate_splits};
use crate::store::{ExpenseFilter, ExpenseStore, PersonDirectory, RecurringStore, StoreError};

use super::types::{ExpenseDraft, ExpenseRecord, NewExpense, SplitEntry};
use super::validation::{ExpenseViolation, validate_draft};

/// Errors from expense operations.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// The draft had problems; nothing was persisted.
    #[error("Validation failed: {}", format_violations(.0))]
    Validation(Vec<ExpenseViolation>),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn format_violations(violations: &[ExpenseViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Service for creating, editing, and reading expenses.
pub struct ExpenseService<'a, S>
where
    S: ExpenseStore + PersonDirectory + RecurringStore,
{
    store: &'a S,
}

impl<'a, S> ExpenseService<'a, S>
where
    S: ExpenseStore + PersonDirectory + RecurringStore,
{
    /// Creates a service over the given store.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validates the draft, resolves its splits, and persists the expense.
    ///
    /// Without custom splits the amount is divided equally among every
    /// known person, payer included. Every person named in the draft is
    /// registered in the directory.
    pub fn create_expense(&self, draft: &ExpenseDraft) -> Result<ExpenseId, ExpenseError> {
        let violations = validate_draft(draft);
        if !violations.is_empty() {
            return Err(ExpenseError::Validation(violations));
        }

        let payer = self.store.get_or_create(draft.paid_by.trim())?;
        let splits = self.resolve_splits(draft)?;

        let id = self.store.append(NewExpense {
            amount: draft.amount,
            description: draft.description.trim().to_string(),
            paid_by: payer.name,
            category: draft.category,
            created_at: Utc::now(),
            template_id: None,
            splits,
        })?;

        tracing::info!(expense_id = %id, amount = %draft.amount, "expense created");
        Ok(id)
    }

    /// Replaces an expense with a revalidated draft. The creation timestamp
    /// and any template link survive the edit; the splits are recomputed
    /// from scratch.
    pub fn update_expense(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<(), ExpenseError> {
        let violations = validate_draft(draft);
        if !violations.is_empty() {
            return Err(ExpenseError::Validation(violations));
        }

        let existing = self.store.get(id)?;
        let payer = self.store.get_or_create(draft.paid_by.trim())?;
        let splits = self.resolve_splits(draft)?;

        self.store.update(
            id,
            NewExpense {
                amount: draft.amount,
                description: draft.description.trim().to_string(),
                paid_by: payer.name,
                category: draft.category,
                created_at: existing.created_at,
                template_id: existing.template_id,
                splits,
            },
        )?;

        tracing::info!(expense_id = %id, "expense updated");
        Ok(())
    }

    /// Deletes an expense and its splits.
    pub fn delete_expense(&self, id: ExpenseId) -> Result<(), ExpenseError> {
        self.store.delete(id)?;
        tracing::info!(expense_id = %id, "expense deleted");
        Ok(())
    }

    /// Returns matching expenses, newest first, after expanding due
    /// recurring templates.
    pub fn expenses(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRecord>, ExpenseError> {
        self.expand_due()?;
        Ok(self.store.query(filter)?)
    }

    /// Returns every person's net position, after expanding due recurring
    /// templates.
    pub fn balances(&self) -> Result<BTreeMap<String, PersonBalance>, ExpenseError> {
        self.expand_due()?;
        let expenses = self.store.all()?;
        Ok(compute_balances(&expenses))
    }

    /// Returns the settlement plan for the current balances.
    pub fn settlements(&self) -> Result<Vec<Settlement>, ExpenseError> {
        Ok(plan_settlements(&self.balances()?))
    }

    fn expand_due(&self) -> Result<(), StoreError> {
        let generated = RecurringService::new(self.store).run_due(Utc::now().date_naive())?;
        if generated > 0 {
            tracing::info!(generated, "materialized recurring expenses before read");
        }
        Ok(())
    }

    /// Turns the draft's splits into persisted entries, registering every
    /// named participant along the way.
    fn resolve_splits(&self, draft: &ExpenseDraft) -> Result<Vec<SplitEntry>, StoreError> {
        let specs: Vec<SplitSpec> = match draft.custom_splits() {
            Some(specs) => {
                for spec in specs {
                    self.store.get_or_create(spec.person_name.trim())?;
                }
                specs.to_vec()
            }
            None => self
                .store
                .people()?
                .into_iter()
                .map(|person| SplitSpec::equal(person.name))
                .collect(),
        };

        Ok(calculate_splits(&specs, draft.amount)
            .into_iter()
            .map(SplitEntry::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use divvy_shared::types::TemplateId;

    use crate::expense::Category;
    use crate::recurring::{NewTemplate, RecurringTemplate};
    use crate::store::Person;

    /// Single-threaded store double backed by plain vectors.
    #[derive(Default)]
    struct TestStore {
        expenses: RefCell<Vec<ExpenseRecord>>,
        people: RefCell<Vec<Person>>,
        templates: RefCell<Vec<RecurringTemplate>>,
    }

    impl ExpenseStore for TestStore {
        fn append(&self, expense: NewExpense) -> Result<ExpenseId, StoreError> {
            let id = ExpenseId::new();
            self.expenses.borrow_mut().push(ExpenseRecord {
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
            Ok(id)
        }

        fn get(&self, id: ExpenseId) -> Result<ExpenseRecord, StoreError> {
            self.expenses
                .borrow()
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or(StoreError::ExpenseNotFound(id))
        }

        fn query(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseRecord>, StoreError> {
            let mut matching: Vec<ExpenseRecord> = self
                .expenses
                .borrow()
                .iter()
                .filter(|e| filter.category.is_none_or(|c| e.category == c))
                .filter(|e| filter.paid_by.as_deref().is_none_or(|p| e.paid_by == p))
                .cloned()
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(matching)
        }

        fn all(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
            Ok(self.expenses.borrow().clone())
        }

        fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), StoreError> {
            let mut expenses = self.expenses.borrow_mut();
            let existing = expenses
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
            let mut expenses = self.expenses.borrow_mut();
            let before = expenses.len();
            expenses.retain(|e| e.id != id);
            if expenses.len() == before {
                return Err(StoreError::ExpenseNotFound(id));
            }
            Ok(())
        }
    }

    impl PersonDirectory for TestStore {
        fn get_or_create(&self, name: &str) -> Result<Person, StoreError> {
            let mut people = self.people.borrow_mut();
            if let Some(person) = people.iter().find(|p| p.name == name) {
                return Ok(person.clone());
            }
            let person = Person {
                id: divvy_shared::types::PersonId::new(),
                name: name.to_string(),
                created_at: Utc::now(),
            };
            people.push(person.clone());
            Ok(person)
        }

        fn people(&self) -> Result<Vec<Person>, StoreError> {
            let mut people = self.people.borrow().clone();
            people.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(people)
        }
    }

    impl RecurringStore for TestStore {
        fn create_template(&self, draft: NewTemplate) -> Result<TemplateId, StoreError> {
            let id = TemplateId::new();
            self.templates.borrow_mut().push(RecurringTemplate {
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
            self.templates
                .borrow()
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or(StoreError::TemplateNotFound(id))
        }

        fn list_active(&self) -> Result<Vec<RecurringTemplate>, StoreError> {
            Ok(self
                .templates
                .borrow()
                .iter()
                .filter(|t| t.is_active)
                .cloned()
                .collect())
        }

        fn persist(&self, template: &RecurringTemplate) -> Result<(), StoreError> {
            let mut templates = self.templates.borrow_mut();
            let stored = templates
                .iter_mut()
                .find(|t| t.id == template.id)
                .ok_or(StoreError::TemplateNotFound(template.id))?;
            if stored.version != template.version {
                return Err(StoreError::Conflict);
            }
            *stored = template.clone();
            stored.version += 1;
            Ok(())
        }

        fn commit_expansion(
            &self,
            template: &RecurringTemplate,
            occurrences: Vec<NewExpense>,
        ) -> Result<Vec<ExpenseId>, StoreError> {
            self.persist(template)?;
            occurrences.into_iter().map(|o| self.append(o)).collect()
        }
    }

    fn draft(amount: Decimal, paid_by: &str) -> ExpenseDraft {
        ExpenseDraft {
            amount,
            description: "Dinner".to_string(),
            paid_by: paid_by.to_string(),
            category: Category::Food,
            splits: None,
        }
    }

    #[test]
    fn test_create_with_custom_splits() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        let mut d = draft(dec!(100), "Shantanu");
        d.splits = Some(vec![
            SplitSpec::exact("Shantanu", dec!(60)),
            SplitSpec::equal("Sanket"),
        ]);
        let id = service.create_expense(&d).unwrap();

        let stored = store.get(id).unwrap();
        assert_eq!(stored.splits.len(), 2);
        assert_eq!(stored.splits[0].calculated_amount, dec!(60));
        assert_eq!(stored.splits[1].calculated_amount, dec!(40));
        // Both participants are now in the directory.
        assert_eq!(store.people().unwrap().len(), 2);
    }

    #[test]
    fn test_create_without_splits_divides_among_everyone() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        store.get_or_create("Sanket").unwrap();
        store.get_or_create("Om").unwrap();

        let id = service.create_expense(&draft(dec!(90), "Shantanu")).unwrap();
        let stored = store.get(id).unwrap();

        let names: Vec<&str> = stored
            .splits
            .iter()
            .map(|s| s.person_name.as_str())
            .collect();
        assert_eq!(names, vec!["Om", "Sanket", "Shantanu"]);
        for split in &stored.splits {
            assert_eq!(split.calculated_amount, dec!(30));
        }
    }

    #[test]
    fn test_create_without_splits_first_expense_is_payer_only() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        let id = service.create_expense(&draft(dec!(50), "Shantanu")).unwrap();
        let stored = store.get(id).unwrap();
        assert_eq!(stored.splits.len(), 1);
        assert_eq!(stored.splits[0].person_name, "Shantanu");
        assert_eq!(stored.splits[0].calculated_amount, dec!(50));
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        let err = service.create_expense(&draft(dec!(0), "")).unwrap_err();
        match err {
            ExpenseError::Validation(violations) => {
                assert!(violations.contains(&ExpenseViolation::NonPositiveAmount));
                assert!(violations.contains(&ExpenseViolation::BlankPayer));
            }
            ExpenseError::Store(_) => panic!("expected validation error"),
        }
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_update_preserves_created_at_and_template_link() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        let id = service.create_expense(&draft(dec!(100), "Shantanu")).unwrap();
        let template_id = TemplateId::new();
        {
            let mut expenses = store.expenses.borrow_mut();
            expenses[0].template_id = Some(template_id);
        }
        let original = store.get(id).unwrap();

        let mut edited = draft(dec!(120), "Sanket");
        edited.description = "Dinner (corrected)".to_string();
        service.update_expense(id, &edited).unwrap();

        let updated = store.get(id).unwrap();
        assert_eq!(updated.amount, dec!(120));
        assert_eq!(updated.paid_by, "Sanket");
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.template_id, Some(template_id));
    }

    #[test]
    fn test_delete_unknown_expense() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);
        let err = service.delete_expense(ExpenseId::new()).unwrap_err();
        assert!(matches!(
            err,
            ExpenseError::Store(StoreError::ExpenseNotFound(_))
        ));
    }

    #[test]
    fn test_balances_and_settlements_flow() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        let mut d = draft(dec!(600), "A");
        d.splits = Some(vec![SplitSpec::equal("A"), SplitSpec::equal("B")]);
        service.create_expense(&d).unwrap();

        let mut d = draft(dec!(450), "B");
        d.splits = Some(vec![SplitSpec::equal("A"), SplitSpec::equal("B")]);
        service.create_expense(&d).unwrap();

        let balances = service.balances().unwrap();
        assert_eq!(balances["A"].balance, dec!(75));
        assert_eq!(balances["B"].balance, dec!(-75));

        let plan = service.settlements().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].from, "B");
        assert_eq!(plan[0].to, "A");
        assert_eq!(plan[0].amount, dec!(75));
    }

    #[test]
    fn test_reads_materialize_due_recurring_expenses() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        let start = Utc::now()
            .date_naive()
            .checked_sub_months(chrono::Months::new(2))
            .unwrap();
        store
            .create_template(NewTemplate {
                amount: dec!(15000),
                description: "Monthly Rent".to_string(),
                paid_by: "Shantanu".to_string(),
                category: Category::Utilities,
                rule: crate::recurring::RecurrenceRule::Monthly,
                start_date: start,
                end_date: None,
            })
            .unwrap();

        let expenses = service.expenses(&ExpenseFilter::default()).unwrap();
        assert_eq!(expenses.len(), 2);
        assert!(
            expenses
                .iter()
                .all(|e| e.description == "Monthly Rent (Auto-generated)")
        );

        // Reading again does not duplicate the occurrences.
        let again = service.expenses(&ExpenseFilter::default()).unwrap();
        assert_eq!(again.len(), 2);
    }

    #[test]
    fn test_query_filter_forwarded() {
        let store = TestStore::default();
        let service = ExpenseService::new(&store);

        service.create_expense(&draft(dec!(10), "A")).unwrap();
        let mut travel = draft(dec!(20), "A");
        travel.category = Category::Travel;
        service.create_expense(&travel).unwrap();

        let filter = ExpenseFilter {
            category: Some(Category::Travel),
            ..ExpenseFilter::default()
        };
        let matching = service.expenses(&filter).unwrap();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].amount, dec!(20));
    }
}
