use derive_more::{Deref, Display};
use serde::Serialize;
use thiserror::Error as ThisError;

///
/// Constants
///

pub(crate) const MAX_IDENTIFIER_LEN: usize = 64;

///
/// IdentifierError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier length {len} exceeds max {max}")]
    TooLong { len: usize, max: usize },

    #[error("identifier '{name}' must not start with a digit")]
    LeadingDigit { name: String },

    #[error("identifier '{name}' contains unsupported character {ch:?}")]
    InvalidChar { name: String, ch: char },
}

// Identifiers are emitted into statement text (quoted) and reused as
// placeholder names, so only ASCII letters, digits and `_` are accepted.
fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    let len = name.len();

    if len == 0 {
        return Err(IdentifierError::Empty);
    }
    if len > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong {
            len,
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(IdentifierError::LeadingDigit {
            name: name.to_string(),
        });
    }
    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(IdentifierError::InvalidChar {
            name: name.to_string(),
            ch,
        });
    }

    Ok(())
}

///
/// TableName
///
/// A table identifier that was returned by the store's catalog.
/// Only the schema introspector mints these.
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct TableName(String);

impl TableName {
    pub(crate) fn from_catalog(name: &str) -> Result<Self, IdentifierError> {
        validate_identifier(name)?;

        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// ColumnName
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ColumnName(String);

impl ColumnName {
    pub(crate) fn from_catalog(name: &str) -> Result<Self, IdentifierError> {
        validate_identifier(name)?;

        Ok(Self(name.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}
