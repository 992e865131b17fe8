use crate::{
    coerce::Value,
    error::{Error, ErrorOrigin},
    schema::ColumnSpec,
};
use serde::{Serialize, Serializer, ser::SerializeMap};

///
/// RecordField
///

#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
    column: ColumnSpec,
    value: Value,
}

impl RecordField {
    #[must_use]
    pub const fn column(&self) -> &ColumnSpec {
        &self.column
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

///
/// TypedRecord
///
/// Coerced values for one pending insert, kept in the order fields were
/// first set. Auto-generated columns can never enter a record.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypedRecord {
    fields: Vec<RecordField>,
}

impl TypedRecord {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set (or replace) the value for `column`.
    pub fn set(&mut self, column: &ColumnSpec, value: Value) -> Result<(), Error> {
        if column.is_auto_generated() {
            return Err(Error::invalid_transition(
                ErrorOrigin::Statement,
                format!("auto-generated column '{}' cannot be set", column.name()),
            ));
        }

        match self
            .fields
            .iter_mut()
            .find(|field| field.column.name() == column.name())
        {
            Some(field) => field.value = value,
            None => self.fields.push(RecordField {
                column: column.clone(),
                value,
            }),
        }

        Ok(())
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|field| field.column.name().as_str() == column)
            .map(|field| &field.value)
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Non-auto-generated columns of `schema` that still lack a value.
    #[must_use]
    pub fn missing<'a>(&self, schema: &'a [ColumnSpec]) -> Vec<&'a ColumnSpec> {
        schema
            .iter()
            .filter(|column| !column.is_auto_generated() && !self.contains(column.name()))
            .collect()
    }

    #[must_use]
    pub fn is_complete_for(&self, schema: &[ColumnSpec]) -> bool {
        self.missing(schema).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordField> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for TypedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(field.column.name().as_str(), &field.value)?;
        }
        map.end()
    }
}
