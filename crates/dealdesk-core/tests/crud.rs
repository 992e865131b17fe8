//! End-to-end insert/delete against an in-memory SQLite store.

use dealdesk_core::{
    error::ValidationErrorKind,
    executor::OperationKind,
    interact::{DriveResult, ScriptedPresenter, run_delete, run_insert},
    prelude::*,
    store::{SqliteStore, Store},
};

const FIXTURE: &str = "
    CREATE TABLE companies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        symbol TEXT NOT NULL UNIQUE,
        company_name TEXT NOT NULL,
        founded_year INTEGER
    );
    CREATE TABLE stock_prices (
        id INTEGER PRIMARY KEY,
        price REAL NOT NULL,
        price_date DATE NOT NULL,
        is_adjusted BOOLEAN
    );
    CREATE TABLE deals (
        deal_id INTEGER PRIMARY KEY,
        symbol TEXT NOT NULL,
        value_musd DECIMAL(12,2),
        announced_on DATE,
        value_busd REAL GENERATED ALWAYS AS (value_musd / 1000) VIRTUAL
    );
";

fn executor() -> CrudExecutor<SqliteStore> {
    let store = SqliteStore::open_in_memory().unwrap();
    store.execute_batch(FIXTURE).unwrap();

    CrudExecutor::new(store)
}

fn count(executor: &CrudExecutor<SqliteStore>, table: &str) -> i64 {
    executor
        .store()
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

fn insert_company(
    executor: &CrudExecutor<SqliteStore>,
    symbol: &str,
    name: &str,
    year: &str,
) -> ExecutionOutcome {
    let mut op = executor.begin_insert();
    op.select_table("companies").unwrap();
    op.set_field("symbol", symbol).unwrap();
    op.set_field("company_name", name).unwrap();
    op.set_field("founded_year", year).unwrap();
    op.request_confirmation().unwrap();

    op.confirm(Confirmation::Confirmed).unwrap().unwrap()
}

#[test]
fn catalog_lists_user_tables_only() {
    let executor = executor();

    let tables = executor.list_tables().unwrap();
    let names = tables.iter().map(TableName::as_str).collect::<Vec<_>>();

    // AUTOINCREMENT creates sqlite_sequence, which is never offered
    assert_eq!(names, ["companies", "deals", "stock_prices"]);
}

#[test]
fn catalog_keeps_user_tables_that_resemble_internal_names() {
    let executor = executor();
    executor
        .store()
        .execute_batch("CREATE TABLE sqlites (symbol TEXT); CREATE TABLE sqliteXdeals (symbol TEXT);")
        .unwrap();

    let tables = executor.list_tables().unwrap();
    let names = tables.iter().map(TableName::as_str).collect::<Vec<_>>();

    assert_eq!(
        names,
        ["companies", "deals", "sqliteXdeals", "sqlites", "stock_prices"]
    );
}

#[test]
fn describe_marks_store_assigned_columns() {
    let executor = executor();

    let (_, columns) = executor.describe_table("deals").unwrap();
    let flags = columns
        .iter()
        .map(|c| (c.name().as_str(), c.is_auto_generated(), c.kind()))
        .collect::<Vec<_>>();

    assert_eq!(
        flags,
        [
            ("deal_id", true, Some(ColumnKind::Integer)),
            ("symbol", false, Some(ColumnKind::Text)),
            ("value_musd", false, Some(ColumnKind::FloatingPoint)),
            ("announced_on", false, Some(ColumnKind::Date)),
            ("value_busd", true, Some(ColumnKind::FloatingPoint)),
        ]
    );
}

#[test]
fn insert_then_delete_round_trip() {
    let executor = executor();

    let outcome = insert_company(&executor, "AAPL", "Apple Inc.", "1976");
    assert_eq!(outcome.status(), OutcomeStatus::Applied);
    assert_eq!(outcome.rows_affected(), 1);
    assert_eq!(count(&executor, "companies"), 1);

    let mut op = executor.begin_delete();
    op.select_table("companies").unwrap();
    op.set_filter("symbol", "aapl").unwrap();
    op.request_confirmation().unwrap();
    let outcome = op.confirm(Confirmation::Confirmed).unwrap().unwrap();

    assert_eq!(outcome.operation(), OperationKind::Delete);
    assert_eq!(outcome.rows_affected(), 1);
    assert_eq!(count(&executor, "companies"), 0);
}

#[test]
fn delete_matches_every_case_variant() {
    let executor = executor();
    insert_company(&executor, "MSFT", "Microsoft", "1975");
    insert_company(&executor, "msft.old", "MICROSOFT", "1975");
    insert_company(&executor, "GOOG", "Alphabet", "");

    let mut op = executor.begin_delete();
    op.select_table("companies").unwrap();
    op.set_filter("company_name", "microsoft").unwrap();
    op.request_confirmation().unwrap();
    let outcome = op.confirm(Confirmation::Confirmed).unwrap().unwrap();

    assert_eq!(outcome.rows_affected(), 2);
    assert_eq!(count(&executor, "companies"), 1);
}

#[test]
fn scenario_no_matching_record() {
    let executor = executor();
    insert_company(&executor, "AAPL", "Apple Inc.", "1976");

    let mut presenter = ScriptedPresenter::new(["companies", "symbol", "ZZZZ", "yes"]);
    let result = run_delete(&executor, &mut presenter).unwrap();

    let DriveResult::Executed(outcome) = result else {
        panic!("expected execution, got {result:?}");
    };
    assert!(outcome.success());
    assert!(outcome.is_no_matching_rows());
    assert_eq!(outcome.summary(), "no matching record found in `companies`");
    assert_eq!(count(&executor, "companies"), 1);
}

#[test]
fn scenario_bad_integer_is_reprompted() {
    let executor = executor();
    let mut op = executor.begin_insert();
    op.select_table("companies").unwrap();
    op.set_field("symbol", "AAPL").unwrap();
    op.set_field("company_name", "Apple Inc.").unwrap();

    let err = op.set_field("founded_year", "abc").unwrap_err();

    assert_eq!(
        err.kind,
        ErrorKind::Validation(ValidationErrorKind::NotAnInteger)
    );
    assert_eq!(op.phase(), Phase::CollectingFields);
    assert_eq!(count(&executor, "companies"), 0);
}

#[test]
fn constraint_violation_fails_without_partial_write() {
    let executor = executor();
    insert_company(&executor, "AAPL", "Apple Inc.", "1976");

    let outcome = insert_company(&executor, "AAPL", "Apple again", "1977");

    assert!(!outcome.success());
    assert_eq!(outcome.status(), OutcomeStatus::Failed);
    assert_eq!(outcome.error_kind(), Some(ErrorKind::Execution));
    assert!(
        outcome
            .error_message()
            .unwrap()
            .contains("UNIQUE constraint failed")
    );
    assert_eq!(count(&executor, "companies"), 1);
}

#[test]
fn typed_values_are_stored_with_their_kinds() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new([
        "stock_prices",
        "187.44",
        "2024-03-01",
        "yes",
        "yes",
    ]);

    let result = run_insert(&executor, &mut presenter).unwrap();
    assert!(matches!(result, DriveResult::Executed(ref outcome) if outcome.success()));

    let row = executor
        .store()
        .connection()
        .query_row(
            "SELECT id, price, price_date, is_adjusted FROM stock_prices",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )
        .unwrap();
    assert_eq!(row, (1, 187.44, "2024-03-01".to_string(), 1));
}

#[test]
fn bad_date_is_rejected_before_the_store() {
    let executor = executor();
    let mut op = executor.begin_insert();
    op.select_table("deals").unwrap();

    let err = op.set_field("announced_on", "03/01/2024").unwrap_err();

    assert_eq!(
        err.kind,
        ErrorKind::Validation(ValidationErrorKind::BadDateFormat)
    );
    assert_eq!(
        op.input_columns()
            .map(|c| c.name().as_str())
            .collect::<Vec<_>>(),
        ["symbol", "value_musd", "announced_on"]
    );
}

#[test]
fn delete_is_refused_on_tables_without_identity_columns() {
    let executor = executor();
    let mut op = executor.begin_delete();

    let err = op.select_table("stock_prices").unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnsupportedFilterColumn);
    assert_eq!(op.phase(), Phase::SelectingTable);
}

#[test]
fn outcomes_serialize_for_machine_output() {
    let executor = executor();

    let outcome = insert_company(&executor, "AAPL", "Apple Inc.", "1976");
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "operation": "insert",
            "table": "companies",
            "status": "applied",
            "success": true,
            "rows_affected": 1,
            "error_message": null,
        })
    );
}

#[test]
fn missing_database_file_is_unavailable() {
    let err = SqliteStore::open("/nonexistent-dir/dealdesk.db", false)
        .err()
        .unwrap();

    let err = Error::from(err);
    assert_eq!(err.kind, ErrorKind::StoreUnavailable);
    assert!(!err.is_recoverable());
}

#[test]
fn store_dialect_is_sqlite() {
    let store = SqliteStore::open_in_memory().unwrap();

    assert_eq!(store.dialect(), dealdesk_core::statement::Dialect::Sqlite);
}
