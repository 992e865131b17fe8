use dealdesk_core::{executor::CrudExecutor, store::SqliteStore};

const FIXTURE: &str = "
    CREATE TABLE companies (
        id INTEGER PRIMARY KEY,
        symbol TEXT NOT NULL,
        company_name TEXT NOT NULL,
        founded_year INTEGER
    );
    CREATE TABLE stock_prices (
        id INTEGER PRIMARY KEY,
        price REAL NOT NULL,
        price_date DATE NOT NULL
    );
";

pub(crate) fn executor() -> CrudExecutor<SqliteStore> {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    store.execute_batch(FIXTURE).expect("fixture schema");

    CrudExecutor::new(store)
}

pub(crate) fn row_count(executor: &CrudExecutor<SqliteStore>, table: &str) -> i64 {
    executor
        .store()
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("row count")
}
