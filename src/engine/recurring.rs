use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::model::RecurringExpense;
use crate::store::ExpenseStore;

/// Upper bound on occurrences advanced per template per run, guarding
/// against degenerate schedules such as a daily template untouched for years.
const MAX_OCCURRENCES_PER_RUN: usize = 1024;

/// What to do when more than one period has elapsed since the last run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CatchUpPolicy {
    /// Materialize every missed occurrence, one expense per elapsed period.
    #[default]
    BackfillMissed,
    /// Materialize only the most recent due occurrence and fast-forward the
    /// schedule past the reference date.
    SkipToNext,
}

/// Outcome summary of one processing run.
#[derive(Debug, Default)]
pub struct RecurringRun {
    /// Expenses newly written this run.
    pub materialized: usize,
    /// Occurrences whose expense already existed from an earlier,
    /// partially-completed run.
    pub already_present: usize,
    pub failures: Vec<TemplateFailure>,
}

#[derive(Debug)]
pub struct TemplateFailure {
    pub template_id: String,
    pub error: StoreError,
}

/// Materializes every due recurring occurrence as of `as_of` and advances
/// each template's schedule past what was processed.
///
/// Meant to run once at session start. `as_of` is an explicit input so runs
/// are deterministic and testable; callers pass today's date in production.
///
/// One template's write failure is recorded and skipped, it never aborts the
/// remaining templates. Expense ids are deterministic per occurrence, so a
/// run interrupted between inserting the expense and persisting the advanced
/// `next_due_date` heals on the next invocation: the re-tried insert reports
/// [`StoreError::DuplicateId`] and advancement continues from where it left
/// off.
pub fn process_recurring<S: ExpenseStore + ?Sized>(
    store: &mut S,
    as_of: NaiveDate,
    policy: CatchUpPolicy,
) -> Result<RecurringRun, StoreError> {
    let templates = store.recurring_templates()?;
    let mut run = RecurringRun::default();

    for template in templates {
        let template_id = template.id.clone();
        if let Err(error) = advance_template(store, template, as_of, policy, &mut run) {
            tracing::warn!(template = %template_id, %error, "recurring template processing failed");
            run.failures.push(TemplateFailure {
                template_id,
                error,
            });
        }
    }

    tracing::debug!(
        materialized = run.materialized,
        already_present = run.already_present,
        failures = run.failures.len(),
        "recurring run complete"
    );
    Ok(run)
}

fn advance_template<S: ExpenseStore + ?Sized>(
    store: &mut S,
    mut template: RecurringExpense,
    as_of: NaiveDate,
    policy: CatchUpPolicy,
    run: &mut RecurringRun,
) -> Result<(), StoreError> {
    if template.ended_by(as_of) {
        return Ok(());
    }

    let mut guard = 0usize;
    while template.next_due_date <= as_of && guard < MAX_OCCURRENCES_PER_RUN {
        guard += 1;
        let due = template.next_due_date;
        let next = template.frequency.next_date(due);

        let fire = match policy {
            CatchUpPolicy::BackfillMissed => true,
            // Only the last elapsed occurrence gets an expense.
            CatchUpPolicy::SkipToNext => next > as_of,
        };
        if fire {
            match store.add_expense(template.materialize(due)) {
                Ok(()) => run.materialized += 1,
                Err(StoreError::DuplicateId(_)) => run.already_present += 1,
                Err(error) => return Err(error),
            }
        }

        template.next_due_date = next;
        store.put_recurring_template(template.clone())?;
    }

    Ok(())
}
