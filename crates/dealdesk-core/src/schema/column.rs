use crate::schema::ColumnName;
use serde::Serialize;
use std::fmt;

///
/// Constants
///

/// Columns that can address rows for deletion, in preference order.
pub const IDENTITY_COLUMNS: [&str; 2] = ["symbol", "company_name"];

///
/// ColumnKind
///
/// Closed set of supported column kinds. Each kind has exactly one
/// parsing rule in the coercer.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    FloatingPoint,
    Date,
    Boolean,
    Text,
}

impl ColumnKind {
    /// Map a store-declared type (e.g. `varchar(45)`, `int(11) unsigned`,
    /// `tinyint(1)`, `REAL`) onto a supported kind.
    #[must_use]
    pub fn from_declared(declared: &str) -> Option<Self> {
        let declared = declared.trim().to_ascii_lowercase();
        let (base, args) = split_declared(&declared);

        match base {
            "bool" | "boolean" => Some(Self::Boolean),
            "tinyint" if args == Some("1") => Some(Self::Boolean),
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "bigint" | "int2"
            | "int4" | "int8" => Some(Self::Integer),
            "float" | "double" | "real" | "decimal" | "dec" | "numeric" | "fixed" => {
                Some(Self::FloatingPoint)
            }
            "date" => Some(Self::Date),
            "char" | "character" | "varchar" | "nchar" | "nvarchar" | "text" | "tinytext"
            | "mediumtext" | "longtext" | "clob" | "enum" | "set" => Some(Self::Text),
            _ => None,
        }
    }

    /// Short input hint shown next to a prompt label.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Integer => "whole number",
            Self::FloatingPoint => "decimal number",
            Self::Date => "YYYY-MM-DD",
            Self::Boolean => "yes/no",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Integer => "integer",
            Self::FloatingPoint => "floating_point",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Text => "text",
        };
        write!(f, "{label}")
    }
}

// Split `decimal(10,2) unsigned` into (`decimal`, Some("10,2")).
fn split_declared(declared: &str) -> (&str, Option<&str>) {
    let end = declared
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(declared.len());
    let base = &declared[..end];

    let args = declared[end..]
        .trim_start()
        .strip_prefix('(')
        .and_then(|rest| rest.split_once(')'))
        .map(|(inner, _)| inner.trim());

    (base, args)
}

///
/// ColumnSpec
///
/// One column as reported by the store at lookup time.
/// Rebuilt on every describe; immutable once returned.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnSpec {
    name: ColumnName,
    declared_type: String,
    kind: Option<ColumnKind>,
    auto_generated: bool,
    nullable: bool,
}

impl ColumnSpec {
    pub(crate) fn new(
        name: ColumnName,
        declared_type: impl Into<String>,
        auto_generated: bool,
        nullable: bool,
    ) -> Self {
        let declared_type = declared_type.into();
        let kind = ColumnKind::from_declared(&declared_type);

        Self {
            name,
            declared_type,
            kind,
            auto_generated,
            nullable,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &ColumnName {
        &self.name
    }

    /// The type text exactly as the store declared it.
    #[must_use]
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// `None` when the declared type has no supported coercion rule.
    #[must_use]
    pub const fn kind(&self) -> Option<ColumnKind> {
        self.kind
    }

    #[must_use]
    pub const fn is_auto_generated(&self) -> bool {
        self.auto_generated
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn is_identity_like(&self) -> bool {
        IDENTITY_COLUMNS
            .iter()
            .any(|identity| self.name.eq_ignore_case(identity))
    }

    /// Prompt label, e.g. `founded_year (int)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.declared_type)
    }
}
