use crate::{
    error::{Error, ErrorKind, ErrorOrigin, ValidationErrorKind},
    schema::{ColumnName, ColumnSpec, IDENTITY_COLUMNS, TableName},
};
use serde::Serialize;

///
/// FilterCriterion
///
/// Single case-insensitive equality used to address rows for deletion.
/// The column is always one of the identity-like columns of the schema.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FilterCriterion {
    column: ColumnName,
    value: String,
}

impl FilterCriterion {
    /// Identity-like columns present in `schema`, in preference order.
    #[must_use]
    pub fn identity_columns(schema: &[ColumnSpec]) -> Vec<&ColumnSpec> {
        IDENTITY_COLUMNS
            .iter()
            .filter_map(|identity| {
                schema
                    .iter()
                    .find(|column| column.name().eq_ignore_case(identity))
            })
            .collect()
    }

    /// Resolve `column` (case-insensitive) against the schema's identity
    /// columns and pair it with a non-empty match value.
    pub fn new(
        table: &TableName,
        schema: &[ColumnSpec],
        column: &str,
        value: &str,
    ) -> Result<Self, Error> {
        let candidates = Self::identity_columns(schema);
        if candidates.is_empty() {
            return Err(Error::unsupported_filter_column(table));
        }

        let Some(resolved) = candidates
            .iter()
            .find(|candidate| candidate.name().eq_ignore_case(column))
        else {
            let allowed = candidates
                .iter()
                .map(|candidate| candidate.name().as_str())
                .collect::<Vec<_>>()
                .join(", ");

            return Err(Error::new(
                ErrorKind::UnsupportedFilterColumn,
                ErrorOrigin::Statement,
                format!("cannot filter '{table}' by '{column}'; expected one of: {allowed}"),
            ));
        };

        if value.is_empty() {
            return Err(Error::validation(
                ValidationErrorKind::MissingValue,
                resolved.name(),
                value,
            ));
        }

        Ok(Self {
            column: resolved.name().clone(),
            value: value.to_string(),
        })
    }

    #[must_use]
    pub const fn column(&self) -> &ColumnName {
        &self.column
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
