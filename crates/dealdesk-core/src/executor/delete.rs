use crate::{
    error::{Error, ErrorKind, ErrorOrigin, ValidationErrorKind},
    executor::{
        Confirmation, CrudExecutor, ExecutionOutcome, OperationKind, Phase, expect_phase,
    },
    obs::MetricsEvent,
    schema::{ColumnSpec, TableName},
    statement::FilterCriterion,
    store::Store,
};

///
/// DeleteOperation
///
/// One delete addressed by a single identity-like column. Tables without
/// one are refused before any statement exists.
///

pub struct DeleteOperation<'e, S: Store> {
    executor: &'e CrudExecutor<S>,
    phase: Phase,
    table: Option<TableName>,
    columns: Vec<ColumnSpec>,
    criterion: Option<FilterCriterion>,
    outcome: Option<ExecutionOutcome>,
}

impl<'e, S: Store> DeleteOperation<'e, S> {
    pub(super) const fn new(executor: &'e CrudExecutor<S>) -> Self {
        Self {
            executor,
            phase: Phase::SelectingTable,
            table: None,
            columns: Vec::new(),
            criterion: None,
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

    /// Identity-like columns the delete can filter on.
    #[must_use]
    pub fn filter_columns(&self) -> Vec<&ColumnSpec> {
        FilterCriterion::identity_columns(&self.columns)
    }

    #[must_use]
    pub const fn criterion(&self) -> Option<&FilterCriterion> {
        self.criterion.as_ref()
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&ExecutionOutcome> {
        self.outcome.as_ref()
    }

    /// `SelectingTable → CollectingFields`.
    ///
    /// Tables lacking `symbol`/`company_name` are refused with
    /// `UnsupportedFilterColumn`; the operation stays in `SelectingTable`.
    pub fn select_table(&mut self, name: &str) -> Result<&TableName, Error> {
        expect_phase(self.phase, Phase::SelectingTable, "select a table")?;

        let (table, columns) = self.executor.describe_table(name)?;
        if FilterCriterion::identity_columns(&columns).is_empty() {
            tracing::warn!(%table, "delete refused: no identity-like column");

            return Err(Error::unsupported_filter_column(&table));
        }

        self.columns = columns;
        self.criterion = None;
        self.phase = Phase::CollectingFields;

        Ok(self.table.insert(table))
    }

    /// Set the single filter. The column is matched case-insensitively
    /// against the identity-like columns; the value must be non-empty.
    pub fn set_filter(&mut self, column: &str, value: &str) -> Result<&FilterCriterion, Error> {
        expect_phase(self.phase, Phase::CollectingFields, "set a filter")?;
        let table = self.selected_table()?;

        let criterion = FilterCriterion::new(table, &self.columns, column, value)?;

        Ok(self.criterion.insert(criterion))
    }

    /// `CollectingFields → AwaitingConfirmation` once a filter is set.
    pub fn request_confirmation(&mut self) -> Result<String, Error> {
        expect_phase(
            self.phase,
            Phase::CollectingFields,
            "request confirmation",
        )?;
        let table = self.selected_table()?;

        let Some(criterion) = &self.criterion else {
            return Err(Error::new(
                ErrorKind::Validation(ValidationErrorKind::MissingValue),
                ErrorOrigin::Executor,
                "no filter set for delete",
            ));
        };

        let message = format!(
            "Delete entries where `{}` = '{}' in `{table}`?",
            criterion.column(),
            criterion.value()
        );

        self.phase = Phase::AwaitingConfirmation;

        Ok(message)
    }

    /// Same contract as the insert confirmation; a zero-row delete
    /// completes with `NoMatchingRows`.
    pub fn confirm(
        &mut self,
        decision: Confirmation,
    ) -> Result<Option<ExecutionOutcome>, Error> {
        expect_phase(self.phase, Phase::AwaitingConfirmation, "confirm")?;
        let table = self.selected_table()?.clone();

        if decision == Confirmation::Declined {
            self.phase = Phase::CollectingFields;
            self.executor.record(MetricsEvent::Cancelled {
                kind: OperationKind::Delete,
                table: table.as_str(),
            });
            tracing::warn!(%table, "delete cancelled");

            return Ok(None);
        }

        let Some(criterion) = &self.criterion else {
            return Err(Error::invalid_transition(
                ErrorOrigin::Executor,
                "confirmed delete without a filter",
            ));
        };

        self.phase = Phase::Executing;

        let statement = self.executor.builder().build_delete(&table, criterion);
        let outcome = self.executor.run(OperationKind::Delete, &table, &statement);

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
