use crate::{
    coerce::Value,
    schema::TableName,
    statement::{Dialect, ParameterizedStatement},
    store::{RawColumn, Store, StoreError},
};
use rusqlite::{
    Connection, ErrorCode, OpenFlags, ToSql,
    types::Value as SqlValue,
};
use std::path::Path;

// Literal prefix match; `_` is a LIKE wildcard.
const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND substr(name, 1, 7) <> 'sqlite_' ORDER BY name";

// Table name is bound, never interpolated.
const DESCRIBE_SQL: &str =
    "SELECT name, type, \"notnull\", pk, hidden FROM pragma_table_xinfo(?1) ORDER BY cid";

// pragma_table_xinfo.hidden values
const HIDDEN_VIRTUAL_TABLE: i64 = 1;
const GENERATED_VIRTUAL: i64 = 2;
const GENERATED_STORED: i64 = 3;

///
/// SqliteStore
///

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database file; `create` allows creating it.
    pub fn open(path: impl AsRef<Path>, create: bool) -> Result<Self, StoreError> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if create {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, flags).map_err(|err| {
            StoreError::Unavailable(format!("cannot open '{}': {err}", path.display()))
        })?;

        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(map_error)?;

        Ok(Self { conn })
    }

    /// Underlying connection, for setup and inspection outside the CRUD path.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run trusted setup SQL (fixtures, bootstrap DDL).
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql).map_err(map_error)
    }
}

impl Store for SqliteStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(LIST_TABLES_SQL).map_err(map_unavailable)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(map_unavailable)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(map_unavailable)
    }

    fn describe_table(&self, table: &TableName) -> Result<Vec<RawColumn>, StoreError> {
        let mut stmt = self.conn.prepare(DESCRIBE_SQL).map_err(map_unavailable)?;
        let rows = stmt
            .query_map([table.as_str()], |row| {
                Ok(XInfoRow {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                    not_null: row.get(2)?,
                    pk: row.get(3)?,
                    hidden: row.get(4)?,
                })
            })
            .map_err(map_unavailable)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_unavailable)?;

        let pk_columns = rows.iter().filter(|row| row.pk > 0).count();

        let columns = rows
            .into_iter()
            .filter(|row| row.hidden != HIDDEN_VIRTUAL_TABLE)
            .map(|row| {
                // A lone INTEGER PRIMARY KEY aliases the rowid and is assigned by the store.
                let rowid_alias = row.pk > 0
                    && pk_columns == 1
                    && row.declared_type.eq_ignore_ascii_case("integer");
                let generated = matches!(row.hidden, GENERATED_VIRTUAL | GENERATED_STORED);

                RawColumn {
                    name: row.name,
                    declared_type: row.declared_type,
                    nullable: !row.not_null && !rowid_alias,
                    auto_generated: rowid_alias || generated,
                }
            })
            .collect();

        Ok(columns)
    }

    fn execute(&self, statement: &ParameterizedStatement) -> Result<u64, StoreError> {
        let bound: Vec<(String, SqlValue)> = statement
            .params()
            .iter()
            .map(|param| (format!(":{}", param.name), to_sql_value(&param.value)))
            .collect();
        let params: Vec<(&str, &dyn ToSql)> = bound
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        // The transaction guard rolls back when dropped without commit.
        let tx = self.conn.unchecked_transaction().map_err(map_unavailable)?;
        let changed = tx
            .execute(statement.sql(), params.as_slice())
            .map_err(map_error)?;
        tx.commit().map_err(map_error)?;

        Ok(changed as u64)
    }
}

struct XInfoRow {
    name: String,
    declared_type: String,
    not_null: bool,
    pk: i64,
    hidden: i64,
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Int(v) => SqlValue::Integer(*v),
        Value::Float(v) => SqlValue::Real(*v),
        Value::Bool(v) => SqlValue::Integer(i64::from(*v)),
        Value::Date(v) => SqlValue::Text(v.to_string()),
        Value::Text(v) => SqlValue::Text(v.clone()),
    }
}

fn map_unavailable(err: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

// Connectivity-class failures are fatal; everything else is a rejection
// of this particular statement.
fn map_error(err: rusqlite::Error) -> StoreError {
    match err.sqlite_error_code() {
        Some(
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::SystemIoFailure
            | ErrorCode::PermissionDenied,
        ) => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Rejected(err.to_string()),
    }
}
