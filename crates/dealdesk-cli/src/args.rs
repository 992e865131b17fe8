use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

///
/// Cli
///

#[derive(Debug, Parser)]
#[command(
    name = "dealdesk",
    version,
    about = "Schema-driven insert/delete over the M&A facts store"
)]
pub struct Cli {
    /// Config file (defaults to ./dealdesk.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// SQLite database file; overrides `[store] path`
    #[arg(long, env = "DEALDESK_DB", global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Log built statements and their bound values
    #[arg(long, global = true)]
    pub debug: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Defaults to the interactive shell
    #[command(subcommand)]
    pub command: Option<Command>,
}

///
/// Command
///

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the tables available for insert/delete
    Tables,

    /// Show a table's columns and how input is coerced
    Describe {
        table: String,
    },

    /// Insert one row; prompts for anything not given
    Insert(InsertArgs),

    /// Delete rows matching `symbol` or `company_name`
    Delete(DeleteArgs),

    /// Interactive shell
    Shell,
}

///
/// InsertArgs
///

#[derive(Debug, Default, Args)]
pub struct InsertArgs {
    #[arg(long)]
    pub table: Option<String>,

    /// Field value, repeatable
    #[arg(long = "set", value_name = "COLUMN=VALUE", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

///
/// DeleteArgs
///

#[derive(Debug, Default, Args)]
pub struct DeleteArgs {
    #[arg(long)]
    pub table: Option<String>,

    /// `symbol` or `company_name`
    #[arg(long)]
    pub column: Option<String>,

    /// Matched case-insensitively
    #[arg(long)]
    pub value: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

///
/// Assignment
///
/// One `--set column=value` pair. The value is kept verbatim, including
/// surrounding whitespace and further `=` signs.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: String,
}

pub(crate) fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let Some((column, value)) = s.split_once('=') else {
        return Err(format!("expected COLUMN=VALUE, got '{s}'"));
    };

    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{s}'"));
    }

    Ok(Assignment {
        column: column.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_the_first_equals() {
        assert_eq!(
            parse_assignment("company_name=A=B Holdings").unwrap(),
            Assignment {
                column: "company_name".to_string(),
                value: "A=B Holdings".to_string(),
            }
        );
        assert_eq!(parse_assignment("founded_year=").unwrap().value, "");
        assert!(parse_assignment("founded_year").is_err());
        assert!(parse_assignment("=1976").is_err());
    }

    #[test]
    fn insert_flags_parse() {
        let cli = Cli::try_parse_from([
            "dealdesk",
            "--db",
            "facts.db",
            "insert",
            "--table",
            "companies",
            "--set",
            "symbol=AAPL",
            "--set",
            "company_name=Apple Inc.",
            "--yes",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("facts.db")));
        assert!(cli.json);

        let args = match cli.command {
            Some(Command::Insert(args)) => args,
            other => panic!("expected insert, got {other:?}"),
        };
        assert_eq!(args.table.as_deref(), Some("companies"));
        assert_eq!(args.set.len(), 2);
        assert_eq!(args.set[1].value, "Apple Inc.");
        assert!(args.yes);
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["dealdesk"]).unwrap();

        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn malformed_assignment_is_a_usage_error() {
        let err = Cli::try_parse_from(["dealdesk", "insert", "--set", "symbol"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn delete_flags_parse() {
        let cli = Cli::try_parse_from([
            "dealdesk", "delete", "--table", "companies", "--column", "symbol", "--value", "aapl",
        ])
        .unwrap();

        let args = match cli.command {
            Some(Command::Delete(args)) => args,
            other => panic!("expected delete, got {other:?}"),
        };
        assert_eq!(args.column.as_deref(), Some("symbol"));
        assert_eq!(args.value.as_deref(), Some("aapl"));
        assert!(!args.yes);
    }
}
