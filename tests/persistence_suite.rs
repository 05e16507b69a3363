use chrono::NaiveDate;
use expense_core::engine::{process_recurring, CatchUpPolicy, Reports};
use expense_core::model::{Budget, CategoryCatalog, Expense, ExpenseFilter, Frequency, RecurringExpense};
use expense_core::store::{ExpenseStore, JsonStore};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn recurring_run_over_json_store_survives_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("expenses.json");

    {
        let mut store = JsonStore::open(&path).expect("open store");
        let mut template =
            RecurringExpense::new(25.0, "Cleaning", "bills", Frequency::Weekly, date(2024, 1, 1));
        template.id = "weekly".into();
        store.put_recurring_template(template).expect("store template");

        let run = process_recurring(&mut store, date(2024, 1, 15), CatchUpPolicy::BackfillMissed)
            .expect("run succeeds");
        assert_eq!(run.materialized, 3);
    }

    let store = JsonStore::open(&path).expect("reopen store");
    let expenses = store.expenses(&ExpenseFilter::all()).expect("expenses");
    assert_eq!(expenses.len(), 3);

    let template = store
        .recurring_templates()
        .expect("templates")
        .into_iter()
        .find(|t| t.id == "weekly")
        .expect("template survives");
    assert_eq!(template.next_due_date, date(2024, 1, 22));

    // A second run against the reopened store is idempotent.
    let mut store = store;
    let again = process_recurring(&mut store, date(2024, 1, 15), CatchUpPolicy::BackfillMissed)
        .expect("second run succeeds");
    assert_eq!(again.materialized, 0);
    assert_eq!(store.expenses(&ExpenseFilter::all()).expect("rows").len(), 3);
}

#[test]
fn reports_read_through_the_json_store() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("expenses.json");

    let mut store = JsonStore::open(&path).expect("open store");
    store
        .add_expense(Expense::new(100.0, "Groceries", "food", date(2024, 3, 1)))
        .expect("add expense");
    store
        .add_expense(Expense::new(30.0, "Bus pass", "transport", date(2024, 3, 10)))
        .expect("add expense");
    store
        .upsert_budget(Budget::new("food", 300.0, 3, 2024))
        .expect("add budget");

    let totals = Reports::category_totals(&store, &ExpenseFilter::all()).expect("totals");
    assert_eq!(totals[0].category, "food");
    assert_eq!(Reports::budget_progress(&store, "food", 3, 2024).expect("progress"), 100.0);
}

#[test]
fn category_catalog_resolves_against_the_json_store() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("expenses.json");

    let mut store = JsonStore::open(&path).expect("open store");
    store
        .add_custom_category(expense_core::model::Category::new("Pets", "#ABCDEF", "paw"))
        .expect("add category");

    let catalog = CategoryCatalog::load(&store).expect("catalog");
    assert!(catalog.resolve("food").is_some());
    assert!(catalog.all().iter().any(|c| c.name == "Pets"));
}
