//! One-shot insert/delete. Values given as flags are applied directly;
//! anything missing is asked through the presenter.

#[cfg(test)]
mod tests;

use crate::{
    args::{DeleteArgs, InsertArgs},
    error::CliError,
};
use dealdesk_core::{
    error::Error,
    executor::{Confirmation, CrudExecutor, ExecutionOutcome},
    interact::{DriveResult, Presenter, run_delete, run_insert},
    schema::{ColumnKind, ColumnSpec},
    store::Store,
};
use std::process::ExitCode;

pub fn insert<S, P>(
    executor: &CrudExecutor<S>,
    presenter: &mut P,
    args: &InsertArgs,
) -> Result<DriveResult, CliError>
where
    S: Store,
    P: Presenter + ?Sized,
{
    let Some(table) = &args.table else {
        if !args.set.is_empty() {
            return Err(CliError::Usage("--set requires --table".to_string()));
        }
        return Ok(run_insert(executor, presenter)?);
    };

    let mut op = executor.begin_insert();
    op.select_table(table)?;

    for assignment in &args.set {
        op.set_field(&assignment.column, &assignment.value)?;
    }

    let pending = op
        .pending_columns()
        .into_iter()
        .cloned()
        .collect::<Vec<ColumnSpec>>();
    for column in &pending {
        let field = column.name().as_str();
        let applied = ask_until_valid(presenter, &column.label(), column.kind(), |raw| {
            op.set_field(field, raw).map(|_| ())
        })?;
        if !applied {
            return Ok(DriveResult::Aborted);
        }
    }

    let message = op.request_confirmation()?;
    let decision = decide(presenter, &message, args.yes);

    Ok(finish(presenter, op.confirm(decision)?, "Insert cancelled."))
}

pub fn delete<S, P>(
    executor: &CrudExecutor<S>,
    presenter: &mut P,
    args: &DeleteArgs,
) -> Result<DriveResult, CliError>
where
    S: Store,
    P: Presenter + ?Sized,
{
    let Some(table) = &args.table else {
        if args.column.is_some() || args.value.is_some() {
            return Err(CliError::Usage(
                "--column and --value require --table".to_string(),
            ));
        }
        return Ok(run_delete(executor, presenter)?);
    };

    let mut op = executor.begin_delete();
    op.select_table(table)?;

    let column = match &args.column {
        Some(column) => column.clone(),
        None => {
            let options = op
                .filter_columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect::<Vec<_>>();
            let chosen = presenter
                .choose_one("Select the column to filter by:", &options)
                .and_then(|index| options.get(index).cloned());

            match chosen {
                Some(column) => column,
                None => return Ok(DriveResult::Aborted),
            }
        }
    };

    match &args.value {
        Some(value) => {
            op.set_filter(&column, value)?;
        }
        None => {
            let label = format!("Enter the value for `{column}`");
            let applied = ask_until_valid(presenter, &label, Some(ColumnKind::Text), |raw| {
                op.set_filter(&column, raw).map(|_| ())
            })?;
            if !applied {
                return Ok(DriveResult::Aborted);
            }
        }
    }

    let message = op.request_confirmation()?;
    let decision = decide(presenter, &message, args.yes);

    Ok(finish(presenter, op.confirm(decision)?, "Deletion cancelled."))
}

/// Process exit status for a finished one-shot operation.
#[must_use]
pub fn exit_code(result: &DriveResult) -> ExitCode {
    match result {
        DriveResult::Executed(outcome) if outcome.success() => ExitCode::SUCCESS,
        DriveResult::Cancelled => ExitCode::SUCCESS,
        DriveResult::Executed(_) | DriveResult::Aborted => ExitCode::FAILURE,
    }
}

// Prompt until `apply` accepts the input. `Ok(false)` means the operator
// aborted.
fn ask_until_valid<P, F>(
    presenter: &mut P,
    label: &str,
    kind: Option<ColumnKind>,
    mut apply: F,
) -> Result<bool, CliError>
where
    P: Presenter + ?Sized,
    F: FnMut(&str) -> Result<(), Error>,
{
    loop {
        let Some(raw) = presenter.prompt_value(label, kind) else {
            return Ok(false);
        };

        match apply(&raw) {
            Ok(()) => return Ok(true),
            Err(err) if err.is_recoverable() => presenter.notify(&err.message),
            Err(err) => return Err(err.into()),
        }
    }
}

fn decide<P: Presenter + ?Sized>(presenter: &mut P, message: &str, assume_yes: bool) -> Confirmation {
    if assume_yes {
        tracing::debug!(message, "confirmation skipped by --yes");
        Confirmation::Confirmed
    } else {
        Confirmation::from(presenter.confirm(message))
    }
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
