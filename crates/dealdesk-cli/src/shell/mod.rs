//! Interactive shell: a line-edited loop over the same operations the
//! one-shot subcommands expose.

#[cfg(test)]
mod tests;

use crate::{
    error::CliError,
    output::Output,
    terminal::{LineInput, TerminalPresenter},
};
use dealdesk_core::{
    error::ErrorKind,
    executor::CrudExecutor,
    interact::{DriveResult, Presenter, run_delete, run_insert},
    obs::metrics_report,
    store::Store,
};

const PROMPT: &str = "dealdesk> ";

const HELP: &str = "\
Commands:
  tables            list tables
  describe <table>  show a table's columns
  insert            insert one row
  delete            delete rows by symbol or company name
  stats             counters for this session
  help              this text
  quit              leave the shell";

///
/// ShellCommand
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ShellCommand {
    Empty,
    Tables,
    Describe(String),
    Insert,
    Delete,
    Stats,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Keywords are case-insensitive.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(keyword) = words.next() else {
            return Ok(Self::Empty);
        };
        let rest = words.collect::<Vec<_>>();

        let command = match keyword.to_ascii_lowercase().as_str() {
            "describe" | "desc" => match rest.as_slice() {
                [table] => return Ok(Self::Describe((*table).to_string())),
                _ => return Err("usage: describe <table>".to_string()),
            },
            "tables" | "ls" => Self::Tables,
            "insert" => Self::Insert,
            "delete" => Self::Delete,
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}'; type 'help'")),
        };

        if rest.is_empty() {
            Ok(command)
        } else {
            Err(format!("'{keyword}' takes no arguments"))
        }
    }
}

///
/// Step
///

#[derive(Debug, Eq, PartialEq)]
pub enum Step {
    Continue(Option<String>),
    Quit,
}

/// Run the shell until `quit` or end of input.
pub fn run<S: Store>(
    executor: &CrudExecutor<S>,
    presenter: &mut TerminalPresenter,
    output: Output,
) -> Result<(), CliError> {
    println!("dealdesk shell; type 'help' for commands.");

    loop {
        let line = match presenter.read_line(PROMPT, true)? {
            LineInput::Line(line) => line,
            LineInput::Interrupted => continue,
            LineInput::Eof => break,
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match dispatch(executor, presenter, output, &command) {
            Ok(Step::Continue(Some(text))) => println!("{text}"),
            Ok(Step::Continue(None)) => {}
            Ok(Step::Quit) => break,
            Err(err) if is_fatal(&err) => return Err(err),
            Err(err) => println!("error: {err}"),
        }
    }

    Ok(())
}

/// Execute one parsed command; returns any text to show.
pub fn dispatch<S, P>(
    executor: &CrudExecutor<S>,
    presenter: &mut P,
    output: Output,
    command: &ShellCommand,
) -> Result<Step, CliError>
where
    S: Store,
    P: Presenter + ?Sized,
{
    let text = match command {
        ShellCommand::Empty => None,
        ShellCommand::Tables => Some(output.tables(&executor.list_tables()?)?),
        ShellCommand::Describe(table) => {
            let (table, columns) = executor.describe_table(table)?;
            Some(output.columns(&table, &columns)?)
        }
        ShellCommand::Insert => {
            log_drive("insert", &run_insert(executor, presenter)?);
            None
        }
        ShellCommand::Delete => {
            log_drive("delete", &run_delete(executor, presenter)?);
            None
        }
        ShellCommand::Stats => Some(output.report(&metrics_report())?),
        ShellCommand::Help => Some(HELP.to_string()),
        ShellCommand::Quit => return Ok(Step::Quit),
    };

    Ok(Step::Continue(text))
}

// A lost store or a broken terminal ends the shell; everything else is
// reported and the loop continues.
const fn is_fatal(err: &CliError) -> bool {
    match err {
        CliError::Core(err) => matches!(err.kind, ErrorKind::StoreUnavailable),
        CliError::Readline(_) => true,
        CliError::Config(_) | CliError::Json(_) | CliError::Usage(_) => false,
    }
}

fn log_drive(op: &str, result: &DriveResult) {
    match result {
        DriveResult::Executed(outcome) => {
            tracing::debug!(op, status = ?outcome.status(), "shell operation finished");
        }
        DriveResult::Cancelled => tracing::debug!(op, "shell operation cancelled"),
        DriveResult::Aborted => tracing::debug!(op, "shell operation aborted"),
    }
}
