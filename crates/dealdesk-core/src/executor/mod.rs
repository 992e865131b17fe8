//! Module: executor
//! Responsibility: per-operation state machines for insert and delete.
//!
//! Phases: `SelectingTable → CollectingFields → AwaitingConfirmation →
//! Executing → {Completed | Failed}`. Nothing reaches the store unless the
//! caller explicitly confirmed; each statement is its own atomic unit and
//! is never retried here.

mod delete;
mod insert;


use crate::{
    coerce::TypeCoercer,
    error::{Error, ErrorKind, ErrorOrigin},
    obs::{GlobalMetricsSink, MetricsEvent, MetricsSink},
    schema::{ColumnSpec, SchemaIntrospector, TableName},
    statement::{ParameterizedStatement, StatementBuilder},
    store::Store,
};
use serde::Serialize;
use std::fmt;

// re-exports
pub use delete::DeleteOperation;
pub use insert::InsertOperation;

///
/// OperationKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
        };
        write!(f, "{label}")
    }
}

///
/// Phase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    SelectingTable,
    CollectingFields,
    AwaitingConfirmation,
    Executing,
    Completed,
    Failed,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SelectingTable => "selecting_table",
            Self::CollectingFields => "collecting_fields",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{label}")
    }
}

///
/// Confirmation
///
/// The operator's answer to the confirmation step.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

///
/// OutcomeStatus
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Statement executed and committed.
    Applied,

    /// Delete executed but matched nothing. Not a failure.
    NoMatchingRows,

    /// Store rejected the statement; nothing was applied.
    Failed,
}

///
/// ExecutionOutcome
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    operation: OperationKind,
    table: TableName,
    status: OutcomeStatus,
    success: bool,
    rows_affected: u64,
    error_message: Option<String>,
    #[serde(skip)]
    error_kind: Option<ErrorKind>,
}

impl ExecutionOutcome {
    fn applied(operation: OperationKind, table: TableName, rows_affected: u64) -> Self {
        let status = if operation == OperationKind::Delete && rows_affected == 0 {
            OutcomeStatus::NoMatchingRows
        } else {
            OutcomeStatus::Applied
        };

        Self {
            operation,
            table,
            status,
            success: true,
            rows_affected,
            error_message: None,
            error_kind: None,
        }
    }

    fn failed(operation: OperationKind, table: TableName, err: &Error) -> Self {
        Self {
            operation,
            table,
            status: OutcomeStatus::Failed,
            success: false,
            rows_affected: 0,
            error_message: Some(err.message.clone()),
            error_kind: Some(err.kind),
        }
    }

    #[must_use]
    pub const fn operation(&self) -> OperationKind {
        self.operation
    }

    #[must_use]
    pub const fn table(&self) -> &TableName {
        &self.table
    }

    #[must_use]
    pub const fn status(&self) -> OutcomeStatus {
        self.status
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub const fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    #[must_use]
    pub const fn is_no_matching_rows(&self) -> bool {
        matches!(self.status, OutcomeStatus::NoMatchingRows)
    }

    /// One-line operator message.
    #[must_use]
    pub fn summary(&self) -> String {
        let table = &self.table;
        let rows = self.rows_affected;

        match (self.operation, self.status) {
            (OperationKind::Insert, OutcomeStatus::Applied | OutcomeStatus::NoMatchingRows) => {
                format!("{rows} row(s) inserted into `{table}`")
            }
            (OperationKind::Delete, OutcomeStatus::Applied) => {
                format!("{rows} record(s) deleted from `{table}`")
            }
            (OperationKind::Delete, OutcomeStatus::NoMatchingRows) => {
                format!("no matching record found in `{table}`")
            }
            (OperationKind::Insert, OutcomeStatus::Failed) => format!(
                "error inserting data: {}",
                self.error_message().unwrap_or_default()
            ),
            (OperationKind::Delete, OutcomeStatus::Failed) => format!(
                "error deleting data: {}",
                self.error_message().unwrap_or_default()
            ),
        }
    }
}

///
/// CrudExecutor
///
/// Session-scoped handle owning the store and its policy (coercion rules,
/// debug, metrics). Operations borrow it for their whole lifetime.
///

pub struct CrudExecutor<S: Store> {
    store: S,
    coercer: TypeCoercer,
    debug: bool,
    metrics: Option<&'static dyn MetricsSink>,
}

impl<S: Store> CrudExecutor<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            coercer: TypeCoercer::new(crate::coerce::BooleanPolicy::Permissive),
            debug: false,
            metrics: None,
        }
    }

    /// Log built statements (text and bound values) at debug level.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub const fn coercer(mut self, coercer: TypeCoercer) -> Self {
        self.coercer = coercer;
        self
    }

    #[must_use]
    pub const fn metrics_sink(mut self, sink: &'static dyn MetricsSink) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn introspector(&self) -> SchemaIntrospector<'_, S> {
        SchemaIntrospector::new(&self.store)
    }

    pub fn list_tables(&self) -> Result<Vec<TableName>, Error> {
        self.introspector().list_tables()
    }

    /// Resolve and describe a table in one step.
    pub fn describe_table(&self, name: &str) -> Result<(TableName, Vec<ColumnSpec>), Error> {
        let introspector = self.introspector();
        let table = introspector.resolve_table(name)?;
        let columns = introspector.describe_table(&table)?;

        Ok((table, columns))
    }

    #[must_use]
    pub fn begin_insert(&self) -> InsertOperation<'_, S> {
        InsertOperation::new(self)
    }

    #[must_use]
    pub fn begin_delete(&self) -> DeleteOperation<'_, S> {
        DeleteOperation::new(self)
    }

    fn builder(&self) -> StatementBuilder {
        StatementBuilder::new(self.store.dialect())
    }

    fn record(&self, event: MetricsEvent<'_>) {
        match self.metrics {
            Some(sink) => sink.record(event),
            None => GlobalMetricsSink.record(event),
        }
    }

    fn debug_log(&self, s: impl AsRef<str>) {
        if self.debug {
            tracing::debug!(target: "dealdesk::executor", "{}", s.as_ref());
        }
    }

    // Executing phase: one statement, one outcome, no retry.
    fn run(
        &self,
        kind: OperationKind,
        table: &TableName,
        statement: &ParameterizedStatement,
    ) -> ExecutionOutcome {
        self.debug_log(format!("{kind} on {table}: {statement}"));
        self.record(MetricsEvent::OperationStart {
            kind,
            table: table.as_str(),
        });

        let outcome = match self.store.execute(statement) {
            Ok(rows) => ExecutionOutcome::applied(kind, table.clone(), rows),
            Err(err) => ExecutionOutcome::failed(kind, table.clone(), &Error::from(err)),
        };

        match outcome.status {
            OutcomeStatus::Applied => {
                tracing::info!(op = %kind, %table, rows = outcome.rows_affected, "statement applied");
            }
            OutcomeStatus::NoMatchingRows => {
                tracing::warn!(op = %kind, %table, "no matching rows");
            }
            OutcomeStatus::Failed => {
                tracing::warn!(
                    op = %kind,
                    %table,
                    error = outcome.error_message().unwrap_or_default(),
                    "statement failed"
                );
            }
        }

        self.record(MetricsEvent::OperationFinish {
            kind,
            table: table.as_str(),
            status: outcome.status,
            rows_affected: outcome.rows_affected,
        });

        outcome
    }

    // Build-time failures leave the operation failed without touching the store.
    fn failed_before_execute(kind: OperationKind, table: &TableName, err: &Error) -> ExecutionOutcome {
        ExecutionOutcome::failed(kind, table.clone(), err)
    }
}

// Shared phase guard for operation steps.
fn expect_phase(current: Phase, expected: Phase, step: &str) -> Result<(), Error> {
    if current == expected {
        Ok(())
    } else {
        Err(Error::invalid_transition(
            ErrorOrigin::Executor,
            format!("cannot {step} while {current} (expected {expected})"),
        ))
    }
}
