use serde::{Deserialize, Serialize};

use super::{ExpenseStore, Result};
use crate::errors::StoreError;
use crate::model::{Budget, Category, Expense, ExpenseFilter, Income, RecurringExpense};

/// In-memory store, insertion-ordered. The default test double, and the
/// table set [`super::JsonStore`] persists to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    expenses: Vec<Expense>,
    #[serde(default)]
    incomes: Vec<Income>,
    #[serde(default)]
    budgets: Vec<Budget>,
    #[serde(default)]
    recurring: Vec<RecurringExpense>,
    #[serde(default)]
    custom_categories: Vec<Category>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
            && self.incomes.is_empty()
            && self.budgets.is_empty()
            && self.recurring.is_empty()
            && self.custom_categories.is_empty()
    }
}

impl ExpenseStore for MemoryStore {
    fn add_expense(&mut self, expense: Expense) -> Result<()> {
        if self.expenses.iter().any(|e| e.id == expense.id) {
            return Err(StoreError::DuplicateId(expense.id));
        }
        self.expenses.push(expense);
        Ok(())
    }

    fn update_expense(&mut self, expense: Expense) -> Result<()> {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(existing) => {
                *existing = expense;
                Ok(())
            }
            None => Err(StoreError::NotFound(expense.id)),
        }
    }

    fn delete_expense(&mut self, id: &str) -> Result<()> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        Ok(self
            .expenses
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    fn add_income(&mut self, income: Income) -> Result<()> {
        if self.incomes.iter().any(|i| i.id == income.id) {
            return Err(StoreError::DuplicateId(income.id));
        }
        self.incomes.push(income);
        Ok(())
    }

    fn update_income(&mut self, income: Income) -> Result<()> {
        match self.incomes.iter_mut().find(|i| i.id == income.id) {
            Some(existing) => {
                *existing = income;
                Ok(())
            }
            None => Err(StoreError::NotFound(income.id)),
        }
    }

    fn delete_income(&mut self, id: &str) -> Result<()> {
        let before = self.incomes.len();
        self.incomes.retain(|i| i.id != id);
        if self.incomes.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn incomes(&self) -> Result<Vec<Income>> {
        Ok(self.incomes.clone())
    }

    fn upsert_budget(&mut self, budget: Budget) -> Result<()> {
        // Insert-or-replace on (category, month, year), matching the original
        // table's unique constraint.
        self.budgets.retain(|b| b.key() != budget.key());
        self.budgets.push(budget);
        Ok(())
    }

    fn budgets(&self) -> Result<Vec<Budget>> {
        Ok(self.budgets.clone())
    }

    fn budgets_for(&self, month: u32, year: i32) -> Result<Vec<Budget>> {
        Ok(self
            .budgets
            .iter()
            .filter(|b| b.month == month && b.year == year)
            .cloned()
            .collect())
    }

    fn delete_budget(&mut self, id: &str) -> Result<()> {
        let before = self.budgets.len();
        self.budgets.retain(|b| b.id != id);
        if self.budgets.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn put_recurring_template(&mut self, template: RecurringExpense) -> Result<()> {
        match self.recurring.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.recurring.push(template),
        }
        Ok(())
    }

    fn recurring_templates(&self) -> Result<Vec<RecurringExpense>> {
        Ok(self.recurring.clone())
    }

    fn delete_recurring_template(&mut self, id: &str) -> Result<()> {
        let before = self.recurring.len();
        self.recurring.retain(|t| t.id != id);
        if self.recurring.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn add_custom_category(&mut self, category: Category) -> Result<()> {
        if self.custom_categories.iter().any(|c| c.id == category.id) {
            return Err(StoreError::DuplicateId(category.id));
        }
        self.custom_categories.push(category);
        Ok(())
    }

    fn update_custom_category(&mut self, category: Category) -> Result<()> {
        match self.custom_categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => {
                *existing = category;
                Ok(())
            }
            None => Err(StoreError::NotFound(category.id)),
        }
    }

    fn delete_custom_category(&mut self, id: &str) -> Result<()> {
        let before = self.custom_categories.len();
        self.custom_categories.retain(|c| c.id != id);
        if self.custom_categories.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn custom_categories(&self) -> Result<Vec<Category>> {
        Ok(self.custom_categories.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duplicate_expense_id_is_rejected() {
        let mut store = MemoryStore::new();
        let mut first = Expense::new(10.0, "Coffee", "food", date(2024, 3, 1));
        first.id = "fixed".into();
        let mut second = Expense::new(99.0, "Other", "bills", date(2024, 3, 2));
        second.id = "fixed".into();

        store.add_expense(first).unwrap();
        let err = store.add_expense(second).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "fixed"));
        // The original row is untouched.
        let rows = store.expenses(&ExpenseFilter::all()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 10.0);
    }

    #[test]
    fn budget_upsert_replaces_on_key_collision() {
        let mut store = MemoryStore::new();
        store.upsert_budget(Budget::new("food", 300.0, 3, 2024)).unwrap();
        store.upsert_budget(Budget::new("food", 450.0, 3, 2024)).unwrap();
        store.upsert_budget(Budget::new("food", 500.0, 4, 2024)).unwrap();

        let march = store.budgets_for(3, 2024).unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].amount, 450.0);
        assert_eq!(store.budgets().unwrap().len(), 2);
    }

    #[test]
    fn expenses_preserve_insertion_order() {
        let mut store = MemoryStore::new();
        store.add_expense(Expense::new(1.0, "a", "food", date(2024, 3, 5))).unwrap();
        store.add_expense(Expense::new(2.0, "b", "food", date(2024, 3, 1))).unwrap();
        let rows = store.expenses(&ExpenseFilter::all()).unwrap();
        assert_eq!(rows[0].description, "a");
        assert_eq!(rows[1].description, "b");
    }

    #[test]
    fn update_missing_expense_errors() {
        let mut store = MemoryStore::new();
        let ghost = Expense::new(5.0, "Ghost", "other", date(2024, 1, 1));
        assert!(matches!(store.update_expense(ghost), Err(StoreError::NotFound(_))));
    }
}
