//! Durable storage for the expense tracker's entities.
//!
//! The engines own no persistent state; everything lives behind
//! [`ExpenseStore`] so tests can swap in [`MemoryStore`] and the application
//! can mount [`JsonStore`] on disk.

pub mod json_backend;
pub mod memory;

use crate::errors::StoreError;
use crate::model::{Budget, Category, Expense, ExpenseFilter, Income, RecurringExpense};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Abstraction over persistence backends. Each call is atomic and durable on
/// its own; multi-step sequences (the recurring engine's insert-then-advance)
/// rely on expense-id idempotence rather than cross-call transactions.
pub trait ExpenseStore {
    /// Inserts a new expense. Fails with [`StoreError::DuplicateId`] when the
    /// id is already present; the recurring engine depends on that signal,
    /// silent overwrite would break its idempotence.
    fn add_expense(&mut self, expense: Expense) -> Result<()>;
    fn update_expense(&mut self, expense: Expense) -> Result<()>;
    fn delete_expense(&mut self, id: &str) -> Result<()>;
    /// Matching expenses in insertion order. Stable order is what makes
    /// tie-breaking in the aggregations deterministic.
    fn expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>>;

    fn add_income(&mut self, income: Income) -> Result<()>;
    fn update_income(&mut self, income: Income) -> Result<()>;
    fn delete_income(&mut self, id: &str) -> Result<()>;
    fn incomes(&self) -> Result<Vec<Income>>;

    /// Insert-or-replace keyed on `(category, month, year)`.
    fn upsert_budget(&mut self, budget: Budget) -> Result<()>;
    fn budgets(&self) -> Result<Vec<Budget>>;
    fn budgets_for(&self, month: u32, year: i32) -> Result<Vec<Budget>>;
    fn delete_budget(&mut self, id: &str) -> Result<()>;

    /// Insert-or-update by template id; the engine uses this to persist an
    /// advanced `next_due_date`.
    fn put_recurring_template(&mut self, template: RecurringExpense) -> Result<()>;
    fn recurring_templates(&self) -> Result<Vec<RecurringExpense>>;
    fn delete_recurring_template(&mut self, id: &str) -> Result<()>;

    fn add_custom_category(&mut self, category: Category) -> Result<()>;
    fn update_custom_category(&mut self, category: Category) -> Result<()>;
    fn delete_custom_category(&mut self, id: &str) -> Result<()>;
    fn custom_categories(&self) -> Result<Vec<Category>>;
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
