use crate::{
    schema::{ColumnName, ColumnSpec, TableName},
    statement::{Dialect, ParameterizedStatement},
    store::{RawColumn, Store, StoreError},
};
use std::cell::{Cell, RefCell};

/// Build a column spec directly, bypassing introspection.
pub(crate) fn column(name: &str, declared: &str, auto: bool, nullable: bool) -> ColumnSpec {
    ColumnSpec::new(
        ColumnName::from_catalog(name).expect("valid test column name"),
        declared,
        auto,
        nullable,
    )
}

pub(crate) fn table(name: &str) -> TableName {
    TableName::from_catalog(name).expect("valid test table name")
}

/// `companies (id auto, symbol, company_name, founded_year)`
pub(crate) fn companies_columns() -> Vec<ColumnSpec> {
    vec![
        column("id", "int", true, false),
        column("symbol", "varchar(10)", false, false),
        column("company_name", "varchar(45)", false, false),
        column("founded_year", "int", false, true),
    ]
}

///
/// StubStore
///
/// In-memory catalog with scripted execution results.
///

pub(crate) struct StubStore {
    dialect: Dialect,
    tables: Vec<(String, Vec<RawColumn>)>,
    unavailable: Cell<bool>,
    next_result: RefCell<Option<Result<u64, StoreError>>>,
    executed: RefCell<Vec<ParameterizedStatement>>,
}

impl StubStore {
    pub(crate) fn new() -> Self {
        Self {
            dialect: Dialect::Sqlite,
            tables: Vec::new(),
            unavailable: Cell::new(false),
            next_result: RefCell::new(None),
            executed: RefCell::new(Vec::new()),
        }
    }

    pub(crate) const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Columns as `(name, declared type, auto_generated, nullable)`.
    pub(crate) fn with_table(mut self, name: &str, columns: &[(&str, &str, bool, bool)]) -> Self {
        let columns = columns
            .iter()
            .map(|(name, declared, auto, nullable)| RawColumn {
                name: (*name).to_string(),
                declared_type: (*declared).to_string(),
                nullable: *nullable,
                auto_generated: *auto,
            })
            .collect();
        self.tables.push((name.to_string(), columns));
        self
    }

    pub(crate) fn companies() -> Self {
        Self::new()
            .with_table(
                "companies",
                &[
                    ("id", "int", true, false),
                    ("symbol", "varchar(10)", false, false),
                    ("company_name", "varchar(45)", false, false),
                    ("founded_year", "int", false, true),
                ],
            )
            .with_table(
                "stock_prices",
                &[
                    ("id", "int", true, false),
                    ("price", "decimal(10,2)", false, false),
                    ("price_date", "date", false, false),
                ],
            )
    }

    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    pub(crate) fn fail_next(&self, err: StoreError) {
        *self.next_result.borrow_mut() = Some(Err(err));
    }

    pub(crate) fn affect_next(&self, rows: u64) {
        *self.next_result.borrow_mut() = Some(Ok(rows));
    }

    pub(crate) fn executed_sql(&self) -> Vec<String> {
        self.executed
            .borrow()
            .iter()
            .map(|statement| statement.sql().to_string())
            .collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.get() {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Store for StubStore {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        self.check_available()?;

        Ok(self.tables.iter().map(|(name, _)| name.clone()).collect())
    }

    fn describe_table(&self, table: &TableName) -> Result<Vec<RawColumn>, StoreError> {
        self.check_available()?;

        self.tables
            .iter()
            .find(|(name, _)| name == table.as_str())
            .map(|(_, columns)| columns.clone())
            .ok_or_else(|| StoreError::Rejected(format!("no such table: {table}")))
    }

    fn execute(&self, statement: &ParameterizedStatement) -> Result<u64, StoreError> {
        self.check_available()?;
        self.executed.borrow_mut().push(statement.clone());

        self.next_result.borrow_mut().take().unwrap_or(Ok(1))
    }
}
