use crate::{
    coerce::{FieldValue, Value},
    error::{Error, ErrorKind, ErrorOrigin, ValidationErrorKind},
    executor::{
        Confirmation, CrudExecutor, ExecutionOutcome, OperationKind, Phase, expect_phase,
    },
    obs::MetricsEvent,
    schema::{ColumnSpec, TableName},
    statement::TypedRecord,
    store::Store,
};

///
/// InsertOperation
///
/// One insert, from table selection to outcome. Values enter the record
/// only after successful coercion; the statement is built and executed
/// only after explicit confirmation.
///

pub struct InsertOperation<'e, S: Store> {
    executor: &'e CrudExecutor<S>,
    phase: Phase,
    table: Option<TableName>,
    columns: Vec<ColumnSpec>,
    record: TypedRecord,
    outcome: Option<ExecutionOutcome>,
}

impl<'e, S: Store> InsertOperation<'e, S> {
    pub(super) const fn new(executor: &'e CrudExecutor<S>) -> Self {
        Self {
            executor,
            phase: Phase::SelectingTable,
            table: None,
            columns: Vec::new(),
            record: TypedRecord::new(),
            outcome: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn table(&self) -> Option<&TableName> {
        self.table.as_ref()
    }

    /// Full column list of the selected table, auto-generated included.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Columns the operator supplies values for.
    pub fn input_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|column| !column.is_auto_generated())
    }

    /// Input columns still lacking a coerced value.
    #[must_use]
    pub fn pending_columns(&self) -> Vec<&ColumnSpec> {
        self.record.missing(&self.columns)
    }

    #[must_use]
    pub const fn record(&self) -> &TypedRecord {
        &self.record
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&ExecutionOutcome> {
        self.outcome.as_ref()
    }

    /// `SelectingTable → CollectingFields`.
    ///
    /// Unknown tables and tables with an input column of unsupported type
    /// leave the operation in `SelectingTable`.
    pub fn select_table(&mut self, name: &str) -> Result<&TableName, Error> {
        expect_phase(self.phase, Phase::SelectingTable, "select a table")?;

        let (table, columns) = self.executor.describe_table(name)?;

        if let Some(column) = columns
            .iter()
            .find(|column| !column.is_auto_generated() && column.kind().is_none())
        {
            return Err(Error::unsupported_column_type(
                column.name(),
                column.declared_type(),
            ));
        }

        self.columns = columns;
        self.record = TypedRecord::new();
        self.phase = Phase::CollectingFields;

        Ok(self.table.insert(table))
    }

    /// Coerce and store one field. Failures keep `CollectingFields`.
    pub fn set_field(&mut self, column: &str, raw: &str) -> Result<&Value, Error> {
        expect_phase(self.phase, Phase::CollectingFields, "set a field")?;
        let table = self.selected_table()?.clone();

        let Some(spec) = find_column(&self.columns, column).cloned() else {
            return Err(Error::unknown_column(&table, column));
        };

        let value = match self.executor.coercer.coerce_field(FieldValue::new(&spec, raw)) {
            Ok(value) => value,
            Err(err) => {
                if matches!(err.kind, ErrorKind::Validation(_)) {
                    self.executor.record(MetricsEvent::ValidationRejected {
                        table: table.as_str(),
                        column: spec.name().as_str(),
                    });
                }
                tracing::debug!(%table, column = %spec.name(), error = %err, "field rejected");

                return Err(err);
            }
        };

        self.record.set(&spec, value)?;

        self.record
            .get(spec.name())
            .ok_or_else(|| Error::unknown_column(&table, spec.name()))
    }

    /// `CollectingFields → AwaitingConfirmation`, once every input column
    /// has a value. Returns the confirmation message.
    pub fn request_confirmation(&mut self) -> Result<String, Error> {
        expect_phase(
            self.phase,
            Phase::CollectingFields,
            "request confirmation",
        )?;
        let table = self.selected_table()?;

        let missing = self.pending_columns();
        if !missing.is_empty() {
            let names = missing
                .iter()
                .map(|column| column.name().as_str())
                .collect::<Vec<_>>()
                .join(", ");

            return Err(Error::new(
                ErrorKind::Validation(ValidationErrorKind::MissingValue),
                ErrorOrigin::Executor,
                format!("missing values for: {names}"),
            ));
        }

        let fields = self
            .record
            .iter()
            .map(|field| format!("{} = {}", field.column().name(), field.value()))
            .collect::<Vec<_>>()
            .join(", ");
        let message = if fields.is_empty() {
            format!("Insert a default row into `{table}`?")
        } else {
            format!("Insert into `{table}`: {fields}?")
        };

        self.phase = Phase::AwaitingConfirmation;

        Ok(message)
    }

    /// `AwaitingConfirmation → Executing → {Completed | Failed}` on
    /// `Confirmed`; back to `CollectingFields` on `Declined`, executing
    /// nothing.
    pub fn confirm(
        &mut self,
        decision: Confirmation,
    ) -> Result<Option<ExecutionOutcome>, Error> {
        expect_phase(self.phase, Phase::AwaitingConfirmation, "confirm")?;
        let table = self.selected_table()?.clone();

        if decision == Confirmation::Declined {
            self.phase = Phase::CollectingFields;
            self.executor.record(MetricsEvent::Cancelled {
                kind: OperationKind::Insert,
                table: table.as_str(),
            });
            tracing::warn!(%table, "insert cancelled");

            return Ok(None);
        }

        self.phase = Phase::Executing;

        let outcome = match self.executor.builder().build_insert(&table, &self.record) {
            Ok(statement) => self.executor.run(OperationKind::Insert, &table, &statement),
            Err(err) => {
                CrudExecutor::<S>::failed_before_execute(OperationKind::Insert, &table, &err)
            }
        };

        self.phase = if outcome.success() {
            Phase::Completed
        } else {
            Phase::Failed
        };
        self.outcome = Some(outcome.clone());

        Ok(Some(outcome))
    }

    fn selected_table(&self) -> Result<&TableName, Error> {
        self.table.as_ref().ok_or_else(|| {
            Error::invalid_transition(ErrorOrigin::Executor, "no table selected")
        })
    }
}

// Exact match first, then a case-insensitive one.
fn find_column<'a>(columns: &'a [ColumnSpec], name: &str) -> Option<&'a ColumnSpec> {
    columns
        .iter()
        .find(|column| column.name().as_str() == name)
        .or_else(|| columns.iter().find(|column| column.name().eq_ignore_case(name)))
}
