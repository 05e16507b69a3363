use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Expense, Frequency};
use crate::errors::ValidationError;

/// A rule that generates concrete [`Expense`] records on a schedule.
///
/// `next_due_date` always names the earliest occurrence that has not been
/// materialized yet, never earlier than `start_date`. A template whose
/// `end_date` has passed stops firing but stays stored so history screens can
/// still show it as ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurringExpense {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub next_due_date: NaiveDate,
}

impl RecurringExpense {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        frequency: Frequency,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            description: description.into(),
            category: category.into(),
            frequency,
            start_date,
            end_date: None,
            next_due_date: start_date,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Deterministic id for the occurrence due on `due`. Re-running the
    /// engine for an already-processed date reproduces the same id, which the
    /// store rejects as a duplicate instead of inserting twice.
    pub fn occurrence_id(&self, due: NaiveDate) -> String {
        format!("{}-{}", self.id, due.format("%Y-%m-%d"))
    }

    /// Builds the concrete expense for the occurrence due on `due`.
    pub fn materialize(&self, due: NaiveDate) -> Expense {
        Expense {
            id: self.occurrence_id(due),
            amount: self.amount,
            description: self.description.clone(),
            category: self.category.clone(),
            date: due,
            notes: None,
            payment_method: None,
            account_id: None,
            receipt_uri: None,
            tags: None,
        }
    }

    /// True once the end date lies strictly before `as_of`. An occurrence due
    /// on the end date itself still fires.
    pub fn ended_by(&self, as_of: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < as_of)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if self.end_date.is_some_and(|end| end < self.start_date) {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(())
    }
}
