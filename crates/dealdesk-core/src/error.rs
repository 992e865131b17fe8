use serde::Serialize;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured error with a stable kind + origin taxonomy.
/// Every failure raised by the CRUD core is local to the operation that
/// raised it; none leaves the store partially mutated.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Construct a store-origin connectivity failure.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, ErrorOrigin::Store, message)
    }

    /// Construct a stale/invalid table selection error.
    pub fn unknown_table(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownTable,
            ErrorOrigin::Schema,
            format!("unknown table: '{name}'"),
        )
    }

    /// Construct a per-field validation error.
    pub fn validation(kind: ValidationErrorKind, column: &str, raw: &str) -> Self {
        Self::new(
            ErrorKind::Validation(kind),
            ErrorOrigin::Coercion,
            format!("invalid value '{raw}' for column '{column}': {kind}"),
        )
    }

    pub fn unknown_column(table: &str, column: &str) -> Self {
        Self::new(
            ErrorKind::UnknownColumn,
            ErrorOrigin::Schema,
            format!("table '{table}' has no input column '{column}'"),
        )
    }

    pub fn unsupported_column_type(column: &str, declared: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedColumnType,
            ErrorOrigin::Schema,
            format!("column '{column}' has unsupported type '{declared}'"),
        )
    }

    pub fn unsupported_filter_column(table: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedFilterColumn,
            ErrorOrigin::Statement,
            format!(
                "table '{table}' does not have 'symbol' or 'company_name'; deletion is not allowed"
            ),
        )
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidIdentifier, ErrorOrigin::Schema, message)
    }

    /// Construct a store rejection; the store message is kept verbatim.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execution, ErrorOrigin::Store, message)
    }

    pub(crate) fn invalid_transition(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTransition, origin, message)
    }

    /// True when the caller can fix the input and retry the same step.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}:{}: {}", self.origin, self.kind, self.message)
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Connection cannot be established or used. Fatal to the operation.
    StoreUnavailable,

    /// Stale or invalid table selection.
    UnknownTable,

    /// Bad user input for one field.
    Validation(ValidationErrorKind),

    /// Field name not present in the selected table.
    UnknownColumn,

    /// The declared column type has no coercion rule.
    UnsupportedColumnType,

    /// Delete requested on a table lacking an identity-like column.
    UnsupportedFilterColumn,

    /// A catalog identifier cannot be safely used in statement text.
    InvalidIdentifier,

    /// The store rejected the statement.
    Execution,

    /// Operation step invoked out of order.
    InvalidTransition,
}

impl ErrorKind {
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::UnknownTable | Self::UnknownColumn | Self::Validation(_)
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StoreUnavailable => "store_unavailable",
            Self::UnknownTable => "unknown_table",
            Self::Validation(_) => "validation",
            Self::UnknownColumn => "unknown_column",
            Self::UnsupportedColumnType => "unsupported_column_type",
            Self::UnsupportedFilterColumn => "unsupported_filter_column",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::Execution => "execution",
            Self::InvalidTransition => "invalid_transition",
        };
        write!(f, "{label}")
    }
}

///
/// ValidationErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ValidationErrorKind {
    NotAnInteger,
    NotANumber,
    BadDateFormat,
    NotABoolean,
    MissingValue,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotAnInteger => "expected a whole number",
            Self::NotANumber => "expected a decimal number",
            Self::BadDateFormat => "expected a calendar date as YYYY-MM-DD",
            Self::NotABoolean => "expected one of 1/0, true/false, yes/no",
            Self::MissingValue => "a value is required",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Schema,
    Coercion,
    Statement,
    Executor,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Schema => "schema",
            Self::Coercion => "coercion",
            Self::Statement => "statement",
            Self::Executor => "executor",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}
