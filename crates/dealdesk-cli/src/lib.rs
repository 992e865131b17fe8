//! `dealdesk` operator CLI: one-shot subcommands and an interactive shell
//! over the schema-driven insert/delete core.

pub mod args;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod shell;
pub mod terminal;

#[cfg(test)]
mod test_support;

use dealdesk_config::{Config, OutputFormat};
use dealdesk_core::{
    coerce::{BooleanPolicy, TypeCoercer},
    executor::CrudExecutor,
    store::SqliteStore,
};
use std::process::ExitCode;

// re-exports
pub use args::{Cli, Command};
pub use error::CliError;

use output::Output;
use terminal::TerminalPresenter;

/// Run a parsed command line to completion.
pub fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    logging::init(cli.debug || config.session.debug);

    let output = Output::new(if cli.json {
        OutputFormat::Json
    } else {
        config.shell.output
    });
    let executor = open_executor(&cli, &config)?;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Tables => {
            println!("{}", output.tables(&executor.list_tables()?)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Describe { table } => {
            let (table, columns) = executor.describe_table(&table)?;
            println!("{}", output.columns(&table, &columns)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Insert(args) => {
            let mut presenter = TerminalPresenter::new(output, config.shell.history_size)?;
            let result = commands::insert(&executor, &mut presenter, &args)?;
            Ok(commands::exit_code(&result))
        }
        Command::Delete(args) => {
            let mut presenter = TerminalPresenter::new(output, config.shell.history_size)?;
            let result = commands::delete(&executor, &mut presenter, &args)?;
            Ok(commands::exit_code(&result))
        }
        Command::Shell => {
            let mut presenter = TerminalPresenter::new(output, config.shell.history_size)?;
            shell::run(&executor, &mut presenter, output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Open the store named by `--db`/`DEALDESK_DB` or `[store] path` and wrap
/// it in an executor carrying the session policy.
pub fn open_executor(cli: &Cli, config: &Config) -> Result<CrudExecutor<SqliteStore>, CliError> {
    let path = cli.db.as_deref().unwrap_or(config.store.path.as_path());
    let store = SqliteStore::open(path, config.store.create_if_missing)
        .map_err(dealdesk_core::error::Error::from)?;

    tracing::debug!(path = %path.display(), "store opened");

    let booleans = if config.session.strict_booleans {
        BooleanPolicy::Strict
    } else {
        BooleanPolicy::Permissive
    };
    let executor = CrudExecutor::new(store).coercer(TypeCoercer::new(booleans));

    Ok(if cli.debug || config.session.debug {
        executor.debug()
    } else {
        executor
    })
}
