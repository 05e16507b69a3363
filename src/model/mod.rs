//! Domain models shared by the store and the engines.

pub mod budget;
pub mod category;
pub mod expense;
pub mod filter;
pub mod frequency;
pub mod recurring;

pub use budget::Budget;
pub use category::{builtin_categories, Category, CategoryCatalog};
pub use expense::{Expense, Income};
pub use filter::ExpenseFilter;
pub use frequency::Frequency;
pub use recurring::RecurringExpense;
