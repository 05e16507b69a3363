//! The two derived-data engines: recurring-expense processing and read-only
//! spending aggregations. Both are pure over a store snapshot plus an
//! explicit reference date; neither keeps state of its own.

pub mod aggregate;
pub mod recurring;

pub use aggregate::{
    CategoryTotal, DetailedStatistics, MonthlyTotal, Reports, SpendingInsights,
};
pub use recurring::{process_recurring, CatchUpPolicy, RecurringRun, TemplateFailure};
