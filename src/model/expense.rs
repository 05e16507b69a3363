use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// A single concrete spending record.
///
/// Identity is an opaque string: user-entered expenses get a random uuid,
/// while expenses materialized from a recurring template carry the
/// deterministic `{template_id}-{due_date}` form so that re-processing the
/// same due date can never create a duplicate row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Expense {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            description: description.into(),
            category: category.into(),
            date,
            notes: None,
            payment_method: None,
            account_id: None,
            receipt_uri: None,
            tags: None,
        }
    }

    /// Checks form-level constraints. Aggregations stay defensive regardless
    /// and skip rows that slipped past this.
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
        Ok(())
    }
}

/// A money-in record. Shares the expense lifecycle but is never generated
/// by the recurring engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Income {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub source: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Income {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        source: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            amount,
            description: description.into(),
            source: source.into(),
            date,
            account_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }
}
