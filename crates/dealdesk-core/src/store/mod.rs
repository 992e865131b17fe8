//! Store boundary.
//!
//! The CRUD core never opens connections itself; it is handed something
//! implementing [`Store`] and issues exactly four kinds of request through it:
//! a catalog listing, a column description, and one parameterized statement
//! per executed operation.

#[cfg(feature = "sqlite")]
mod sqlite;

use crate::{
    error::Error,
    schema::TableName,
    statement::{Dialect, ParameterizedStatement},
};
use thiserror::Error as ThisError;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

///
/// Store
///

pub trait Store {
    /// Identifier quoting rules for statement text.
    fn dialect(&self) -> Dialect;

    /// `SHOW TABLES` equivalent.
    fn list_tables(&self) -> Result<Vec<String>, StoreError>;

    /// `DESCRIBE <table>` equivalent, in declaration order.
    fn describe_table(&self, table: &TableName) -> Result<Vec<RawColumn>, StoreError>;

    /// Run one statement as its own atomic unit and return affected rows.
    /// Implementations must commit on success and roll back on every
    /// other exit path.
    fn execute(&self, statement: &ParameterizedStatement) -> Result<u64, StoreError>;
}

///
/// RawColumn
///
/// Column metadata as the store reports it, before identifier validation.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub declared_type: String,
    pub nullable: bool,
    pub auto_generated: bool,
}

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => Self::store_unavailable(err.to_string()),
            StoreError::Rejected(message) => Self::execution(message),
        }
    }
}
