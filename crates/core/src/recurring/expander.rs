//! Pure expansion of a recurring template into dated occurrences.
//!
//! `expand_template` never touches storage: it takes a template snapshot and
//! today's date and returns the occurrences to create plus the template as
//! it should be persisted afterwards. Committing both atomically is the
//! service's job.

use chrono::{Days, Months, NaiveDate, NaiveTime};

use crate::expense::NewExpense;

use super::types::{RecurrenceRule, RecurringTemplate};

impl RecurrenceRule {
    /// Returns the occurrence date following `date`.
    ///
    /// Monthly and yearly advances clamp to the last valid day of the
    /// target month (Jan 31 -> Feb 28, Feb 29 -> Feb 28 on non-leap
    /// years); the next advance then walks from the clamped date.
    /// `None` only on date overflow, far outside any realistic range.
    #[must_use]
    pub fn advance(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

/// The outcome of expanding one template.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// Occurrences to persist, oldest first. Generated without splits, so
    /// they resolve through the legacy equal-share fallback.
    pub occurrences: Vec<NewExpense>,
    /// The template with its cursor advanced and, when expired, its active
    /// flag cleared.
    pub template: RecurringTemplate,
}

impl Expansion {
    /// True if there is nothing to persist.
    #[must_use]
    pub fn is_noop(&self, before: &RecurringTemplate) -> bool {
        self.occurrences.is_empty() && self.template == *before
    }
}

/// Walks the template's cursor forward to `today` and materializes every
/// missed occurrence.
///
/// A template whose end date has passed is deactivated without generating
/// anything, even if occurrences between the cursor and the end date were
/// never materialized. Otherwise occurrences are emitted for every
/// rule-step after `last_generated.unwrap_or(start_date)` that is on or
/// before both `today` and the end date.
///
/// Idempotent: expanding the returned template again with the same `today`
/// yields no occurrences.
#[must_use]
pub fn expand_template(template: &RecurringTemplate, today: NaiveDate) -> Expansion {
    let mut updated = template.clone();
    let mut occurrences = Vec::new();

    if !template.is_active {
        return Expansion {
            occurrences,
            template: updated,
        };
    }

    if let Some(end) = template.end_date
        && today > end
    {
        updated.is_active = false;
        return Expansion {
            occurrences,
            template: updated,
        };
    }

    let mut cursor = template.last_generated.unwrap_or(template.start_date);

    while let Some(next) = template.rule.advance(cursor) {
        if next > today {
            break;
        }
        if let Some(end) = template.end_date
            && next > end
        {
            break;
        }

        occurrences.push(NewExpense {
            amount: template.amount,
            description: format!("{} (Auto-generated)", template.description),
            paid_by: template.paid_by.clone(),
            category: template.category,
            created_at: next.and_time(NaiveTime::MIN).and_utc(),
            template_id: Some(template.id),
            splits: Vec::new(),
        });
        cursor = next;
    }

    if !occurrences.is_empty() {
        updated.last_generated = Some(cursor);
    }

    Expansion {
        occurrences,
        template: updated,
    }
}
