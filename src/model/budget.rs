use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// A spending limit for one category in one calendar month.
///
/// The store keeps at most one budget per `(category, month, year)` tuple;
/// writing a second one for the same tuple replaces the first. Consumption
/// against the limit is always derived from the expense set, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub month: u32,
    pub year: i32,
}

impl Budget {
    pub fn new(category: impl Into<String>, amount: f64, month: u32, year: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category: category.into(),
            amount,
            month,
            year,
        }
    }

    /// Uniqueness key enforced by the store's upsert.
    pub fn key(&self) -> (&str, u32, i32) {
        (self.category.as_str(), self.month, self.year)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if !(1..=12).contains(&self.month) {
            return Err(ValidationError::MonthOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_category_month_year() {
        let budget = Budget::new("food", 400.0, 3, 2024);
        assert_eq!(budget.key(), ("food", 3, 2024));
    }

    #[test]
    fn month_must_be_in_range() {
        let budget = Budget::new("food", 400.0, 13, 2024);
        assert_eq!(budget.validate(), Err(ValidationError::MonthOutOfRange));
    }
}
