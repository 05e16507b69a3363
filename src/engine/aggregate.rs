use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::model::{Expense, ExpenseFilter};
use crate::store::ExpenseStore;

/// Total spend for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Total spend for one calendar month. Months without spend are absent;
/// zero-filling a chart is the presentation layer's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTotal {
    pub month: u32,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedStatistics {
    pub total_spending: f64,
    pub transaction_count: usize,
    pub average_transaction: f64,
    pub largest_expense: f64,
    pub smallest_expense: f64,
    pub daily_average: f64,
    pub category_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingInsights {
    pub highest_category: String,
    pub highest_amount: f64,
    pub total_expenses: usize,
    pub average_expense: f64,
}

// Rows with non-positive amounts are invalid input that must not corrupt
// sums; every aggregation skips them.
fn countable(expense: &Expense) -> bool {
    expense.amount > 0.0
}

/// Per-category totals, sorted descending by total. Ties keep the order in
/// which the categories were first encountered, so identical inputs always
/// give identical output.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for expense in expenses.iter().filter(|e| countable(e)) {
        match totals.iter_mut().find(|t| t.category == expense.category) {
            Some(entry) => entry.total += expense.amount,
            None => totals.push(CategoryTotal {
                category: expense.category.clone(),
                total: expense.amount,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Totals grouped by calendar month, ascending, optionally restricted to one
/// year.
pub fn monthly_totals(expenses: &[Expense], year: Option<i32>) -> Vec<MonthlyTotal> {
    let mut by_month: BTreeMap<u32, f64> = BTreeMap::new();
    for expense in expenses.iter().filter(|e| countable(e)) {
        if year.is_some_and(|y| expense.date.year() != y) {
            continue;
        }
        *by_month.entry(expense.date.month()).or_insert(0.0) += expense.amount;
    }
    by_month
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Spend consumed against a category's budget for one month: the sum of
/// matching expenses between the first and the actual last day of that month.
pub fn budget_progress(expenses: &[Expense], category: &str, month: u32, year: i32) -> f64 {
    let Some(window) = ExpenseFilter::for_month(month, year) else {
        return 0.0;
    };
    let window = window.category(category);
    expenses
        .iter()
        .filter(|e| countable(e) && window.matches(e))
        .map(|e| e.amount)
        .sum()
}

/// Summary statistics over the expense set, or `None` when nothing counts.
///
/// `daily_average` divides by the inclusive day span between the earliest and
/// latest expense; a single-day set spans one day, so the division is always
/// defined.
pub fn detailed_statistics(expenses: &[Expense]) -> Option<DetailedStatistics> {
    let counted: Vec<&Expense> = expenses.iter().filter(|e| countable(e)).collect();
    let first = counted.first()?;

    let total_spending: f64 = counted.iter().map(|e| e.amount).sum();
    let transaction_count = counted.len();
    let mut largest = first.amount;
    let mut smallest = first.amount;
    let mut min_date = first.date;
    let mut max_date = first.date;
    for expense in &counted {
        largest = largest.max(expense.amount);
        smallest = smallest.min(expense.amount);
        min_date = min_date.min(expense.date);
        max_date = max_date.max(expense.date);
    }
    let day_span = (max_date - min_date).num_days() + 1;

    Some(DetailedStatistics {
        total_spending,
        transaction_count,
        average_transaction: total_spending / transaction_count as f64,
        largest_expense: largest,
        smallest_expense: smallest,
        daily_average: total_spending / day_span as f64,
        category_count: category_totals(expenses).len(),
    })
}

/// The `limit` largest expenses, descending by amount. The sort is stable, so
/// equal amounts keep their store order.
pub fn top_expenses(expenses: &[Expense], limit: usize) -> Vec<Expense> {
    let mut sorted: Vec<Expense> = expenses.iter().filter(|e| countable(e)).cloned().collect();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted.truncate(limit);
    sorted
}

/// Headline numbers for the insights card, or `None` when nothing counts.
/// `highest_category` is the argmax of [`category_totals`], ties resolved by
/// that function's own ordering.
pub fn spending_insights(expenses: &[Expense]) -> Option<SpendingInsights> {
    let totals = category_totals(expenses);
    let highest = totals.first()?;
    let counted: Vec<&Expense> = expenses.iter().filter(|e| countable(e)).collect();
    let total: f64 = counted.iter().map(|e| e.amount).sum();

    Some(SpendingInsights {
        highest_category: highest.category.clone(),
        highest_amount: highest.total,
        total_expenses: counted.len(),
        average_expense: total / counted.len() as f64,
    })
}

/// Read-only derived views the presentation layer queries on demand. Each
/// call recomputes from the current store snapshot; nothing is cached.
pub struct Reports;

impl Reports {
    pub fn category_totals<S: ExpenseStore + ?Sized>(
        store: &S,
        filter: &ExpenseFilter,
    ) -> Result<Vec<CategoryTotal>, StoreError> {
        Ok(category_totals(&store.expenses(filter)?))
    }

    pub fn monthly_totals<S: ExpenseStore + ?Sized>(
        store: &S,
        year: Option<i32>,
    ) -> Result<Vec<MonthlyTotal>, StoreError> {
        Ok(monthly_totals(&store.expenses(&ExpenseFilter::all())?, year))
    }

    pub fn budget_progress<S: ExpenseStore + ?Sized>(
        store: &S,
        category: &str,
        month: u32,
        year: i32,
    ) -> Result<f64, StoreError> {
        Ok(budget_progress(
            &store.expenses(&ExpenseFilter::all())?,
            category,
            month,
            year,
        ))
    }

    pub fn detailed_statistics<S: ExpenseStore + ?Sized>(
        store: &S,
        filter: &ExpenseFilter,
    ) -> Result<Option<DetailedStatistics>, StoreError> {
        Ok(detailed_statistics(&store.expenses(filter)?))
    }

    pub fn top_expenses<S: ExpenseStore + ?Sized>(
        store: &S,
        filter: &ExpenseFilter,
        limit: usize,
    ) -> Result<Vec<Expense>, StoreError> {
        Ok(top_expenses(&store.expenses(filter)?, limit))
    }

    pub fn spending_insights<S: ExpenseStore + ?Sized>(
        store: &S,
        filter: &ExpenseFilter,
    ) -> Result<Option<SpendingInsights>, StoreError> {
        Ok(spending_insights(&store.expenses(filter)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(amount: f64, category: &str, day: NaiveDate) -> Expense {
        Expense::new(amount, "Sample", category, day)
    }

    fn march_set() -> Vec<Expense> {
        vec![
            expense(100.0, "food", date(2024, 3, 1)),
            expense(50.0, "food", date(2024, 3, 15)),
            expense(30.0, "transport", date(2024, 3, 10)),
        ]
    }

    #[test]
    fn category_totals_sorted_descending() {
        let totals = category_totals(&march_set());
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "food");
        assert_eq!(totals[0].total, 150.0);
        assert_eq!(totals[1].category, "transport");
        assert_eq!(totals[1].total, 30.0);
    }

    #[test]
    fn category_totals_ties_keep_first_encounter_order() {
        let rows = vec![
            expense(20.0, "bills", date(2024, 3, 2)),
            expense(20.0, "shopping", date(2024, 3, 3)),
        ];
        let totals = category_totals(&rows);
        assert_eq!(totals[0].category, "bills");
        assert_eq!(totals[1].category, "shopping");
    }

    #[test]
    fn non_positive_amounts_do_not_corrupt_sums() {
        let mut rows = march_set();
        rows.push(expense(0.0, "food", date(2024, 3, 20)));
        rows.push(expense(-25.0, "food", date(2024, 3, 21)));
        let totals = category_totals(&rows);
        assert_eq!(totals[0].total, 150.0);
        let stats = detailed_statistics(&rows).unwrap();
        assert_eq!(stats.transaction_count, 3);
        assert_eq!(stats.smallest_expense, 30.0);
    }

    #[test]
    fn monthly_totals_groups_and_restricts_by_year() {
        let mut rows = march_set();
        rows.push(expense(40.0, "food", date(2024, 4, 2)));
        rows.push(expense(99.0, "food", date(2023, 3, 2)));

        let all_years = monthly_totals(&rows, None);
        assert_eq!(
            all_years,
            vec![
                MonthlyTotal { month: 3, total: 279.0 },
                MonthlyTotal { month: 4, total: 40.0 },
            ]
        );

        let only_2024 = monthly_totals(&rows, Some(2024));
        assert_eq!(only_2024[0], MonthlyTotal { month: 3, total: 180.0 });
    }

    #[test]
    fn detailed_statistics_matches_scenario() {
        let stats = detailed_statistics(&march_set()).unwrap();
        assert_eq!(stats.total_spending, 180.0);
        assert_eq!(stats.transaction_count, 3);
        assert_eq!(stats.average_transaction, 60.0);
        assert_eq!(stats.largest_expense, 100.0);
        assert_eq!(stats.smallest_expense, 30.0);
        // Mar 1 .. Mar 15 inclusive is 15 days.
        assert_eq!(stats.daily_average, 12.0);
        assert_eq!(stats.category_count, 2);
    }

    #[test]
    fn single_day_set_spans_one_day() {
        let rows = vec![expense(30.0, "food", date(2024, 3, 5))];
        let stats = detailed_statistics(&rows).unwrap();
        assert_eq!(stats.daily_average, 30.0);
    }

    #[test]
    fn empty_set_yields_no_data() {
        assert!(detailed_statistics(&[]).is_none());
        assert!(spending_insights(&[]).is_none());
        assert!(category_totals(&[]).is_empty());
        assert!(top_expenses(&[], 5).is_empty());
        assert!(monthly_totals(&[], None).is_empty());
    }

    #[test]
    fn budget_progress_respects_month_boundaries() {
        let rows = vec![
            expense(80.0, "food", date(2024, 2, 29)),
            expense(120.0, "food", date(2024, 3, 1)),
            expense(10.0, "transport", date(2024, 2, 10)),
        ];
        assert_eq!(budget_progress(&rows, "food", 2, 2024), 80.0);
        assert_eq!(budget_progress(&rows, "food", 3, 2024), 120.0);
        assert_eq!(budget_progress(&rows, "food", 13, 2024), 0.0);
    }

    #[test]
    fn top_expenses_truncates_and_breaks_ties_stably() {
        let mut first = expense(50.0, "food", date(2024, 3, 1));
        first.description = "first".into();
        let mut second = expense(50.0, "bills", date(2024, 3, 2));
        second.description = "second".into();
        let rows = vec![first, expense(10.0, "food", date(2024, 3, 3)), second];

        let top = top_expenses(&rows, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].description, "first");
        assert_eq!(top[1].description, "second");
    }

    #[test]
    fn insights_pick_highest_category() {
        let insights = spending_insights(&march_set()).unwrap();
        assert_eq!(insights.highest_category, "food");
        assert_eq!(insights.highest_amount, 150.0);
        assert_eq!(insights.total_expenses, 3);
        assert_eq!(insights.average_expense, 60.0);
    }

    #[test]
    fn category_totals_sum_matches_filtered_sum() {
        let rows = march_set();
        let sum_of_totals: f64 = category_totals(&rows).iter().map(|t| t.total).sum();
        let direct_sum: f64 = rows.iter().filter(|e| e.amount > 0.0).map(|e| e.amount).sum();
        assert_eq!(sum_of_totals, direct_sum);
    }
}
