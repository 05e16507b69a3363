use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Expense;

/// Optional narrowing applied to expense queries and aggregations.
///
/// Absent fields pass everything. Date bounds are inclusive; comparing typed
/// dates is equivalent to the lexicographic order of their fixed-width ISO
/// strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ExpenseFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// Covering exactly one calendar month, with the true last day of that
    /// month as the upper bound.
    pub fn for_month(month: u32, year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = super::frequency::last_day_of_month(year, month)?;
        Some(Self::all().between(start, end))
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = &self.category {
            if &expense.category != category {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if expense.date > end {
                return false;
            }
        }
        if let Some(query) = &self.search {
            let needle = query.to_lowercase();
            if !expense.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }
}
