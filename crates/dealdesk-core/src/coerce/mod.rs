//! Module: coerce
//! Responsibility: turn raw operator input into typed column values.
//!
//! Each `ColumnKind` has exactly one parsing rule. Invalid input never
//! produces a value; the caller re-prompts the same field.

mod value;


use crate::{
    error::{Error, ErrorOrigin, ValidationErrorKind},
    schema::{ColumnKind, ColumnSpec},
};

// re-exports
pub use value::{Date, Value};

const TRUE_WORDS: [&str; 3] = ["1", "true", "yes"];
const FALSE_WORDS: [&str; 3] = ["0", "false", "no"];

///
/// BooleanPolicy
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BooleanPolicy {
    /// Recognized true words map to true; any other non-empty input is false.
    #[default]
    Permissive,

    /// Only recognized true/false words are accepted.
    Strict,
}

///
/// FieldValue
///
/// Raw operator input paired with the column it is meant for.
///

#[derive(Clone, Copy, Debug)]
pub struct FieldValue<'a> {
    pub column: &'a ColumnSpec,
    pub raw: &'a str,
}

impl<'a> FieldValue<'a> {
    #[must_use]
    pub const fn new(column: &'a ColumnSpec, raw: &'a str) -> Self {
        Self { column, raw }
    }
}

///
/// TypeCoercer
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TypeCoercer {
    booleans: BooleanPolicy,
}

impl TypeCoercer {
    #[must_use]
    pub const fn new(booleans: BooleanPolicy) -> Self {
        Self { booleans }
    }

    #[must_use]
    pub const fn boolean_policy(&self) -> BooleanPolicy {
        self.booleans
    }

    /// Coerce one raw input against its column.
    pub fn coerce(&self, column: &ColumnSpec, raw: &str) -> Result<Value, Error> {
        if column.is_auto_generated() {
            return Err(Error::invalid_transition(
                ErrorOrigin::Coercion,
                format!(
                    "column '{}' is assigned by the store and cannot take input",
                    column.name()
                ),
            ));
        }

        let Some(kind) = column.kind() else {
            return Err(Error::unsupported_column_type(
                column.name(),
                column.declared_type(),
            ));
        };

        if raw.is_empty() && column.is_nullable() && kind != ColumnKind::Text {
            return Ok(Value::Null);
        }

        let invalid = |reason| Error::validation(reason, column.name(), raw);

        match kind {
            ColumnKind::Integer => parse_integer(raw)
                .map(Value::Int)
                .ok_or_else(|| invalid(ValidationErrorKind::NotAnInteger)),

            ColumnKind::FloatingPoint => parse_float(raw)
                .map(Value::Float)
                .ok_or_else(|| invalid(ValidationErrorKind::NotANumber)),

            ColumnKind::Date => Date::parse(raw)
                .map(Value::Date)
                .ok_or_else(|| invalid(ValidationErrorKind::BadDateFormat)),

            ColumnKind::Boolean => self
                .parse_boolean(raw)
                .map(Value::Bool)
                .ok_or_else(|| invalid(ValidationErrorKind::NotABoolean)),

            ColumnKind::Text => Ok(Value::Text(raw.to_string())),
        }
    }

    pub fn coerce_field(&self, field: FieldValue<'_>) -> Result<Value, Error> {
        self.coerce(field.column, field.raw)
    }

    fn parse_boolean(&self, raw: &str) -> Option<bool> {
        let matches = |words: &[&str]| words.iter().any(|w| raw.eq_ignore_ascii_case(w));

        if matches(&TRUE_WORDS) {
            return Some(true);
        }

        match self.booleans {
            BooleanPolicy::Permissive => Some(false),
            BooleanPolicy::Strict => matches(&FALSE_WORDS).then_some(false),
        }
    }
}

// Optional sign followed by one or more ASCII digits, within i64.
fn parse_integer(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    raw.parse().ok()
}

// Plain decimal notation with an optional exponent; no inf/nan spellings.
fn parse_float(raw: &str) -> Option<f64> {
    let body = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let starts_numeric = body.starts_with(|c: char| c.is_ascii_digit() || c == '.');
    if !starts_numeric {
        return None;
    }

    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
