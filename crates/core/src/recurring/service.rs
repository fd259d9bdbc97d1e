//! Recurring template service: creation, deactivation, and due-date runs.

use chrono::NaiveDate;
use thiserror::Error;

use divvy_shared::types::TemplateId;

use crate::store::{RecurringStore, StoreError};

use super::expander::expand_template;
use super::types::{NewTemplate, RecurringTemplate, TemplateViolation};

/// How many times a conflicted expansion commit is re-attempted before the
/// caller proceeds with the last committed state.
const MAX_EXPANSION_ATTEMPTS: u32 = 3;

/// Errors from recurring template operations.
#[derive(Debug, Error)]
pub enum RecurringError {
    /// The template draft had problems; nothing was persisted.
    #[error("Validation failed: {}", format_violations(.0))]
    Validation(Vec<TemplateViolation>),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn format_violations(violations: &[TemplateViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Service for recurring template operations.
pub struct RecurringService<'a, S: RecurringStore> {
    store: &'a S,
}

impl<'a, S: RecurringStore> RecurringService<'a, S> {
    /// Creates a service over the given store.
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validates and persists a new template.
    pub fn create_template(&self, draft: NewTemplate) -> Result<TemplateId, RecurringError> {
        let violations = draft.validate();
        if !violations.is_empty() {
            return Err(RecurringError::Validation(violations));
        }
        Ok(self.store.create_template(draft)?)
    }

    /// Deactivates a template. Its already-generated expenses remain.
    pub fn deactivate(&self, id: TemplateId) -> Result<(), RecurringError> {
        self.set_active(id, false)
    }

    /// Activates or deactivates a template. A reactivated template resumes
    /// generating from its existing cursor on the next run.
    pub fn set_active(&self, id: TemplateId, active: bool) -> Result<(), RecurringError> {
        let mut template = self.store.template(id)?;
        if template.is_active == active {
            return Ok(());
        }
        template.is_active = active;
        self.store.persist(&template)?;
        tracing::info!(template_id = %id, active, "template activation changed");
        Ok(())
    }

    /// Replaces a template's end date. `None` makes it open-ended; a date
    /// before the start date is rejected without persisting anything.
    pub fn set_end_date(
        &self,
        id: TemplateId,
        end_date: Option<NaiveDate>,
    ) -> Result<(), RecurringError> {
        let mut template = self.store.template(id)?;
        if let Some(end) = end_date
            && end < template.start_date
        {
            return Err(RecurringError::Validation(vec![
                TemplateViolation::EndBeforeStart,
            ]));
        }
        template.end_date = end_date;
        self.store.persist(&template)?;
        tracing::info!(template_id = %id, end_date = ?end_date, "template end date changed");
        Ok(())
    }

    /// Expands every active template up to `today` and returns the number
    /// of expenses generated.
    ///
    /// Safe under concurrent invocation: each template's occurrences and
    /// cursor are committed atomically with a version check, a conflicted
    /// commit is retried against a re-read template, and after
    /// [`MAX_EXPANSION_ATTEMPTS`] the run gives up on that template so the
    /// triggering read can proceed with the last committed state.
    pub fn run_due(&self, today: NaiveDate) -> Result<usize, StoreError> {
        let mut generated = 0;
        for template in self.store.list_active()? {
            generated += self.expand_one(template, today)?;
        }
        Ok(generated)
    }

    fn expand_one(
        &self,
        mut template: RecurringTemplate,
        today: NaiveDate,
    ) -> Result<usize, StoreError> {
        for attempt in 1..=MAX_EXPANSION_ATTEMPTS {
            let expansion = expand_template(&template, today);
            if expansion.is_noop(&template) {
                return Ok(0);
            }

            let count = expansion.occurrences.len();
            match self
                .store
                .commit_expansion(&expansion.template, expansion.occurrences)
            {
                Ok(_) => {
                    tracing::debug!(
                        template_id = %template.id,
                        count,
                        cursor = ?expansion.template.last_generated,
                        "expanded recurring template"
                    );
                    return Ok(count);
                }
                Err(err) if err.is_retryable() => {
                    tracing::warn!(
                        template_id = %template.id,
                        attempt,
                        "expansion commit conflicted, re-reading template"
                    );
                    template = self.store.template(template.id)?;
                }
                Err(err) => return Err(err),
            }
        }

        tracing::warn!(
            template_id = %template.id,
            "expansion retries exhausted, proceeding with last committed state"
        );
        Ok(0)
    }
}
