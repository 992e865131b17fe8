use super::*;
use crate::test_support::{executor, row_count};
use dealdesk_config::OutputFormat;
use dealdesk_core::interact::ScriptedPresenter;

fn text() -> Output {
    Output::new(OutputFormat::Text)
}

#[test]
fn commands_parse_case_insensitively() {
    let cases = [
        ("", ShellCommand::Empty),
        ("   ", ShellCommand::Empty),
        ("tables", ShellCommand::Tables),
        ("TABLES", ShellCommand::Tables),
        ("describe companies", ShellCommand::Describe("companies".to_string())),
        ("desc  stock_prices ", ShellCommand::Describe("stock_prices".to_string())),
        ("insert", ShellCommand::Insert),
        ("Delete", ShellCommand::Delete),
        ("stats", ShellCommand::Stats),
        ("?", ShellCommand::Help),
        ("exit", ShellCommand::Quit),
    ];

    for (line, expected) in cases {
        assert_eq!(ShellCommand::parse(line), Ok(expected), "{line:?}");
    }
}

#[test]
fn malformed_commands_explain_themselves() {
    assert_eq!(
        ShellCommand::parse("describe"),
        Err("usage: describe <table>".to_string())
    );
    assert_eq!(
        ShellCommand::parse("insert companies"),
        Err("'insert' takes no arguments".to_string())
    );
    assert!(ShellCommand::parse("drop companies").unwrap_err().contains("unknown command"));
}

#[test]
fn describe_renders_columns() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());

    let step = dispatch(
        &executor,
        &mut presenter,
        text(),
        &ShellCommand::Describe("stock_prices".to_string()),
    )
    .unwrap();

    let Step::Continue(Some(rendered)) = step else {
        panic!("expected output, got {step:?}");
    };
    assert!(rendered.starts_with("Columns of `stock_prices`:"));
    assert!(rendered.contains("price_date"));
}

#[test]
fn unknown_table_is_a_recoverable_error() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());

    let err = dispatch(
        &executor,
        &mut presenter,
        text(),
        &ShellCommand::Describe("mergers".to_string()),
    )
    .unwrap_err();

    assert!(!is_fatal(&err));
    assert!(err.to_string().contains("unknown table"));
}

#[test]
fn insert_runs_the_interactive_driver() {
    let executor = executor();
    let mut presenter =
        ScriptedPresenter::new(["companies", "AAPL", "Apple Inc.", "1976", "yes"]);

    let step = dispatch(&executor, &mut presenter, text(), &ShellCommand::Insert).unwrap();

    assert_eq!(step, Step::Continue(None));
    assert_eq!(row_count(&executor, "companies"), 1);
    assert_eq!(presenter.transcript().outcomes.len(), 1);
}

#[test]
fn quit_stops_the_loop() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());

    let step = dispatch(&executor, &mut presenter, text(), &ShellCommand::Quit).unwrap();

    assert_eq!(step, Step::Quit);
}

#[test]
fn help_lists_every_command() {
    for command in ["tables", "describe", "insert", "delete", "stats", "quit"] {
        assert!(HELP.contains(command), "{command}");
    }
}
