//! Module: statement
//! Responsibility: parameterized INSERT/DELETE construction.
//!
//! Invariants:
//! - Values only ever travel as bound parameters.
//! - Identifiers in statement text come from schema introspection
//!   (`TableName`, `ColumnName`) and are always quoted.

mod filter;
mod record;


use crate::{
    coerce::Value,
    error::{Error, ErrorOrigin},
    schema::TableName,
};
use std::fmt;

// re-exports
pub use filter::FilterCriterion;
pub use record::{RecordField, TypedRecord};

/// Placeholder bound to the delete match value.
pub const FILTER_PARAM: &str = "value";

///
/// Dialect
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Dialect {
    #[default]
    Sqlite,

    /// Backtick quoting for a `Store` backed by MySQL.
    MySql,
}

impl Dialect {
    /// Quote an identifier, doubling any embedded quote character.
    #[must_use]
    pub fn quote_ident(self, ident: &str) -> String {
        let quote = match self {
            Self::Sqlite => '"',
            Self::MySql => '`',
        };
        let escaped = ident.replace(quote, &format!("{quote}{quote}"));

        format!("{quote}{escaped}{quote}")
    }

    const fn empty_insert_suffix(self) -> &'static str {
        match self {
            Self::Sqlite => "DEFAULT VALUES",
            Self::MySql => "() VALUES ()",
        }
    }
}

///
/// Param
///

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Placeholder name without the leading `:`.
    pub name: String,
    pub value: Value,
}

///
/// ParameterizedStatement
///
/// Statement text plus its named parameters. Only the builder creates these.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterizedStatement {
    sql: String,
    params: Vec<Param>,
}

impl ParameterizedStatement {
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .map(|param| &param.value)
    }
}

impl fmt::Display for ParameterizedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)?;
        if !self.params.is_empty() {
            let params = self
                .params
                .iter()
                .map(|param| format!(":{}={}", param.name, param.value))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " [{params}]")?;
        }

        Ok(())
    }
}

///
/// StatementBuilder
///

#[derive(Clone, Copy, Debug, Default)]
pub struct StatementBuilder {
    dialect: Dialect,
}

impl StatementBuilder {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// `INSERT INTO <t> (<c>, ..) VALUES (:<c>, ..)`
    pub fn build_insert(
        &self,
        table: &TableName,
        record: &TypedRecord,
    ) -> Result<ParameterizedStatement, Error> {
        let table_ident = self.dialect.quote_ident(table);

        if record.is_empty() {
            return Ok(ParameterizedStatement {
                sql: format!(
                    "INSERT INTO {table_ident} {}",
                    self.dialect.empty_insert_suffix()
                ),
                params: Vec::new(),
            });
        }

        let mut columns = Vec::with_capacity(record.len());
        let mut placeholders = Vec::with_capacity(record.len());
        let mut params = Vec::with_capacity(record.len());

        for field in record.iter() {
            let column = field.column();
            if column.is_auto_generated() {
                return Err(Error::invalid_transition(
                    ErrorOrigin::Statement,
                    format!("auto-generated column '{}' in insert record", column.name()),
                ));
            }

            columns.push(self.dialect.quote_ident(column.name()));
            placeholders.push(format!(":{}", column.name()));
            params.push(Param {
                name: column.name().to_string(),
                value: field.value().clone(),
            });
        }

        Ok(ParameterizedStatement {
            sql: format!(
                "INSERT INTO {table_ident} ({}) VALUES ({})",
                columns.join(", "),
                placeholders.join(", ")
            ),
            params,
        })
    }

    /// `DELETE FROM <t> WHERE LOWER(<c>) = LOWER(:value)`
    #[must_use]
    pub fn build_delete(
        &self,
        table: &TableName,
        criterion: &FilterCriterion,
    ) -> ParameterizedStatement {
        ParameterizedStatement {
            sql: format!(
                "DELETE FROM {} WHERE LOWER({}) = LOWER(:{FILTER_PARAM})",
                self.dialect.quote_ident(table),
                self.dialect.quote_ident(criterion.column()),
            ),
            params: vec![Param {
                name: FILTER_PARAM.to_string(),
                value: Value::Text(criterion.value().to_string()),
            }],
        }
    }
}
