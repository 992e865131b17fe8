//! Module: interact
//! Responsibility: drive insert/delete operations over a presentation
//! surface, re-prompting on recoverable errors.
//!
//! The presenter is synchronous request/response; every wait for input is
//! a blocking call from the driver's point of view.

mod scripted;


use crate::{
    error::{Error, ErrorKind},
    executor::{Confirmation, CrudExecutor, ExecutionOutcome},
    schema::{ColumnKind, TableName},
    store::Store,
};

// re-exports
pub use scripted::{ScriptedPresenter, Transcript};

///
/// Presenter
///
/// `None` from a prompt means the operator aborted the operation.
///

pub trait Presenter {
    /// Pick one entry; returns its index.
    fn choose_one(&mut self, prompt: &str, options: &[String]) -> Option<usize>;

    fn prompt_value(&mut self, label: &str, kind: Option<ColumnKind>) -> Option<String>;

    fn confirm(&mut self, message: &str) -> bool;

    fn report(&mut self, outcome: &ExecutionOutcome);

    /// Surface a recoverable problem or notice before re-prompting.
    fn notify(&mut self, message: &str);
}

///
/// DriveResult
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DriveResult {
    /// Statement executed; the outcome was reported.
    Executed(ExecutionOutcome),

    /// Operator declined the confirmation.
    Cancelled,

    /// Operator aborted a prompt, or there was nothing to choose from.
    Aborted,
}

/// Interactive insert: pick a table, fill every input column, confirm.
pub fn run_insert<S, P>(executor: &CrudExecutor<S>, presenter: &mut P) -> Result<DriveResult, Error>
where
    S: Store,
    P: Presenter + ?Sized,
{
    let mut op = executor.begin_insert();

    // SelectingTable
    loop {
        let Some(table) = choose_table(
            executor,
            presenter,
            "Select the table you want to insert data into:",
        )?
        else {
            return Ok(DriveResult::Aborted);
        };

        match op.select_table(&table) {
            Ok(_) => break,
            Err(err) if is_retryable_selection(&err) => presenter.notify(&err.message),
            Err(err) => return Err(err),
        }
    }

    // CollectingFields
    let pending = op
        .pending_columns()
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    for column in &pending {
        loop {
            let Some(raw) = presenter.prompt_value(&column.label(), column.kind()) else {
                return Ok(DriveResult::Aborted);
            };

            match op.set_field(column.name(), &raw) {
                Ok(_) => break,
                Err(err) if err.is_recoverable() => presenter.notify(&err.message),
                Err(err) => return Err(err),
            }
        }
    }

    // AwaitingConfirmation
    let message = op.request_confirmation()?;
    let decision = Confirmation::from(presenter.confirm(&message));

    Ok(finish(presenter, op.confirm(decision)?, "Insert cancelled."))
}

/// Interactive delete: pick a table, pick the identity column, enter the
/// match value, confirm.
pub fn run_delete<S, P>(executor: &CrudExecutor<S>, presenter: &mut P) -> Result<DriveResult, Error>
where
    S: Store,
    P: Presenter + ?Sized,
{
    let mut op = executor.begin_delete();

    loop {
        let Some(table) = choose_table(
            executor,
            presenter,
            "Select the table you want to delete data from:",
        )?
        else {
            return Ok(DriveResult::Aborted);
        };

        match op.select_table(&table) {
            Ok(_) => break,
            Err(err) if is_retryable_selection(&err) => presenter.notify(&err.message),
            Err(err) => return Err(err),
        }
    }

    let options = op
        .filter_columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect::<Vec<_>>();

    let Some(index) = presenter.choose_one("Select the column to filter by:", &options) else {
        return Ok(DriveResult::Aborted);
    };
    let Some(column) = options.get(index) else {
        return Ok(DriveResult::Aborted);
    };

    loop {
        let label = format!("Enter the value for `{column}`");
        let Some(value) = presenter.prompt_value(&label, Some(ColumnKind::Text)) else {
            return Ok(DriveResult::Aborted);
        };

        match op.set_filter(column, &value) {
            Ok(_) => break,
            Err(err) if err.is_recoverable() => presenter.notify(&err.message),
            Err(err) => return Err(err),
        }
    }

    let message = op.request_confirmation()?;
    let decision = Confirmation::from(presenter.confirm(&message));

    Ok(finish(presenter, op.confirm(decision)?, "Deletion cancelled."))
}

fn choose_table<S, P>(
    executor: &CrudExecutor<S>,
    presenter: &mut P,
    prompt: &str,
) -> Result<Option<TableName>, Error>
where
    S: Store,
    P: Presenter + ?Sized,
{
    let tables = executor.list_tables()?;
    if tables.is_empty() {
        presenter.notify("No tables found in the database.");
        return Ok(None);
    }

    let options = tables.iter().map(ToString::to_string).collect::<Vec<_>>();

    Ok(presenter
        .choose_one(prompt, &options)
        .and_then(|index| tables.get(index).cloned()))
}

// Selection failures that should send the operator back to the table list.
const fn is_retryable_selection(err: &Error) -> bool {
    matches!(
        err.kind,
        ErrorKind::UnknownTable
            | ErrorKind::UnsupportedColumnType
            | ErrorKind::UnsupportedFilterColumn
            | ErrorKind::InvalidIdentifier
    )
}

fn finish<P: Presenter + ?Sized>(
    presenter: &mut P,
    outcome: Option<ExecutionOutcome>,
    cancelled: &str,
) -> DriveResult {
    match outcome {
        Some(outcome) => {
            presenter.report(&outcome);
            DriveResult::Executed(outcome)
        }
        None => {
            presenter.notify(cancelled);
            DriveResult::Cancelled
        }
    }
}
