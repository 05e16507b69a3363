use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{ExpenseStore, MemoryStore, Result};
use crate::model::{Budget, Category, Expense, ExpenseFilter, Income, RecurringExpense};
use crate::utils::{app_data_dir, ensure_dir, write_atomic};

const STORE_FILE: &str = "expenses.json";

/// File-backed store: the whole table set lives in one JSON document that is
/// rewritten atomically after every mutation.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: MemoryStore,
}

impl JsonStore {
    /// Opens the store at `path`, creating an empty one when the file does
    /// not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            if let Some(parent) = path.parent() {
                ensure_dir(parent)?;
            }
            MemoryStore::new()
        };
        Ok(Self { path, data })
    }

    /// Opens the store in the application data directory
    /// (`~/.expense_core/expenses.json` unless `EXPENSE_CORE_HOME` overrides it).
    pub fn open_default() -> Result<Self> {
        Self::open(app_data_dir().join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        write_atomic(&self.path, &json)
    }

    fn mutate(&mut self, op: impl FnOnce(&mut MemoryStore) -> Result<()>) -> Result<()> {
        op(&mut self.data)?;
        self.persist()
    }
}

impl ExpenseStore for JsonStore {
    fn add_expense(&mut self, expense: Expense) -> Result<()> {
        self.mutate(|data| data.add_expense(expense))
    }

    fn update_expense(&mut self, expense: Expense) -> Result<()> {
        self.mutate(|data| data.update_expense(expense))
    }

    fn delete_expense(&mut self, id: &str) -> Result<()> {
        self.mutate(|data| data.delete_expense(id))
    }

    fn expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        self.data.expenses(filter)
    }

    fn add_income(&mut self, income: Income) -> Result<()> {
        self.mutate(|data| data.add_income(income))
    }

    fn update_income(&mut self, income: Income) -> Result<()> {
        self.mutate(|data| data.update_income(income))
    }

    fn delete_income(&mut self, id: &str) -> Result<()> {
        self.mutate(|data| data.delete_income(id))
    }

    fn incomes(&self) -> Result<Vec<Income>> {
        self.data.incomes()
    }

    fn upsert_budget(&mut self, budget: Budget) -> Result<()> {
        self.mutate(|data| data.upsert_budget(budget))
    }

    fn budgets(&self) -> Result<Vec<Budget>> {
        self.data.budgets()
    }

    fn budgets_for(&self, month: u32, year: i32) -> Result<Vec<Budget>> {
        self.data.budgets_for(month, year)
    }

    fn delete_budget(&mut self, id: &str) -> Result<()> {
        self.mutate(|data| data.delete_budget(id))
    }

    fn put_recurring_template(&mut self, template: RecurringExpense) -> Result<()> {
        self.mutate(|data| data.put_recurring_template(template))
    }

    fn recurring_templates(&self) -> Result<Vec<RecurringExpense>> {
        self.data.recurring_templates()
    }

    fn delete_recurring_template(&mut self, id: &str) -> Result<()> {
        self.mutate(|data| data.delete_recurring_template(id))
    }

    fn add_custom_category(&mut self, category: Category) -> Result<()> {
        self.mutate(|data| data.add_custom_category(category))
    }

    fn update_custom_category(&mut self, category: Category) -> Result<()> {
        self.mutate(|data| data.update_custom_category(category))
    }

    fn delete_custom_category(&mut self, id: &str) -> Result<()> {
        self.mutate(|data| data.delete_custom_category(id))
    }

    fn custom_categories(&self) -> Result<Vec<Category>> {
        self.data.custom_categories()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn reopen_reads_back_written_rows() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(STORE_FILE);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        {
            let mut store = JsonStore::open(&path).expect("open");
            store
                .add_expense(Expense::new(12.5, "Lunch", "food", date))
                .expect("add expense");
            store
                .upsert_budget(Budget::new("food", 300.0, 3, 2024))
                .expect("add budget");
        }

        let store = JsonStore::open(&path).expect("reopen");
        let rows = store.expenses(&ExpenseFilter::all()).expect("expenses");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Lunch");
        assert_eq!(store.budgets().expect("budgets").len(), 1);
    }

    #[test]
    fn failed_mutation_is_not_persisted() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join(STORE_FILE);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let mut store = JsonStore::open(&path).expect("open");
        let mut expense = Expense::new(12.5, "Lunch", "food", date);
        expense.id = "dup".into();
        store.add_expense(expense.clone()).expect("first insert");
        assert!(store.add_expense(expense).is_err());

        let reloaded = JsonStore::open(&path).expect("reopen");
        assert_eq!(reloaded.expenses(&ExpenseFilter::all()).expect("rows").len(), 1);
    }
}
