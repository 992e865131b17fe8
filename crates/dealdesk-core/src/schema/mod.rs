//! Module: schema
//! Responsibility: catalog and column metadata discovery against the store.
//! Does not own: value coercion or statement construction.
//!
//! Invariants:
//! - `TableName` values only come from a catalog listing.
//! - Column metadata is read fresh on every call; nothing is cached.

mod column;
mod identity;


use crate::{
    error::Error,
    store::{RawColumn, Store},
};

// re-exports
pub use column::{ColumnKind, ColumnSpec, IDENTITY_COLUMNS};
pub use identity::{ColumnName, IdentifierError, TableName};

///
/// SchemaIntrospector
///
/// Read-only view over the store's catalog.
///

pub struct SchemaIntrospector<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> SchemaIntrospector<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List tables the core is able to address.
    ///
    /// Catalog entries whose names cannot be used as identifiers are
    /// skipped rather than offered for selection.
    pub fn list_tables(&self) -> Result<Vec<TableName>, Error> {
        let names = self.store.list_tables()?;

        let tables = names
            .iter()
            .filter_map(|name| match TableName::from_catalog(name) {
                Ok(table) => Some(table),
                Err(err) => {
                    tracing::warn!(table = %name, error = %err, "skipping catalog entry");
                    None
                }
            })
            .collect();

        Ok(tables)
    }

    /// Resolve a caller selection against a fresh catalog listing.
    pub fn resolve_table(&self, name: &str) -> Result<TableName, Error> {
        self.list_tables()?
            .into_iter()
            .find(|table| table.as_str() == name)
            .ok_or_else(|| Error::unknown_table(name))
    }

    /// Describe a table's columns in store order.
    pub fn describe_table(&self, table: &TableName) -> Result<Vec<ColumnSpec>, Error> {
        // Stale selections are rejected before touching column metadata.
        if !self.list_tables()?.contains(table) {
            return Err(Error::unknown_table(table));
        }

        self.store
            .describe_table(table)?
            .into_iter()
            .map(column_from_raw)
            .collect()
    }
}

fn column_from_raw(raw: RawColumn) -> Result<ColumnSpec, Error> {
    let name = ColumnName::from_catalog(&raw.name).map_err(|err| {
        Error::invalid_identifier(format!("column '{}': {err}", raw.name))
    })?;

    Ok(ColumnSpec::new(
        name,
        raw.declared_type,
        raw.auto_generated,
        raw.nullable,
    ))
}
