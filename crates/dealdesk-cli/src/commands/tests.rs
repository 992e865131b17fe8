use super::*;
use crate::{
    args::Assignment,
    test_support::{executor, row_count},
};
use dealdesk_core::{error::ErrorKind, interact::ScriptedPresenter};

fn set(column: &str, value: &str) -> Assignment {
    Assignment {
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn insert_args(set_values: Vec<Assignment>, yes: bool) -> InsertArgs {
    InsertArgs {
        table: Some("companies".to_string()),
        set: set_values,
        yes,
    }
}

#[test]
fn fully_specified_insert_needs_no_prompts() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());
    let args = insert_args(
        vec![
            set("symbol", "AAPL"),
            set("company_name", "Apple Inc."),
            set("founded_year", "1976"),
        ],
        true,
    );

    let result = insert(&executor, &mut presenter, &args).unwrap();

    assert!(matches!(result, DriveResult::Executed(ref outcome) if outcome.success()));
    assert!(presenter.transcript().prompts.is_empty());
    assert_eq!(row_count(&executor, "companies"), 1);
    assert_eq!(exit_code(&result), ExitCode::SUCCESS);
}

#[test]
fn missing_fields_are_prompted() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(["not a year", "1976", "yes"]);
    let args = insert_args(
        vec![set("symbol", "AAPL"), set("company_name", "Apple Inc.")],
        false,
    );

    let result = insert(&executor, &mut presenter, &args).unwrap();

    assert!(matches!(result, DriveResult::Executed(_)));
    let transcript = presenter.transcript();
    assert_eq!(transcript.prompts.len(), 3);
    assert_eq!(transcript.prompts[0], "founded_year (INTEGER) [whole number]");
    assert_eq!(transcript.notices.len(), 1);
}

#[test]
fn invalid_flag_value_fails_without_prompting() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(["unused"]);
    let args = insert_args(vec![set("founded_year", "abc")], true);

    let err = insert(&executor, &mut presenter, &args).unwrap_err();

    assert!(matches!(
        err,
        CliError::Core(Error {
            kind: ErrorKind::Validation(_),
            ..
        })
    ));
    assert_eq!(presenter.remaining(), 1);
    assert_eq!(row_count(&executor, "companies"), 0);
}

#[test]
fn set_without_table_is_a_usage_error() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());
    let args = InsertArgs {
        table: None,
        set: vec![set("symbol", "AAPL")],
        yes: true,
    };

    let err = insert(&executor, &mut presenter, &args).unwrap_err();

    assert!(matches!(err, CliError::Usage(_)));
}

#[test]
fn insert_without_table_runs_interactively() {
    let executor = executor();
    let mut presenter =
        ScriptedPresenter::new(["companies", "MSFT", "Microsoft", "1975", "no"]);

    let result = insert(&executor, &mut presenter, &InsertArgs::default()).unwrap();

    assert_eq!(result, DriveResult::Cancelled);
    assert_eq!(row_count(&executor, "companies"), 0);
    assert_eq!(exit_code(&result), ExitCode::SUCCESS);
}

#[test]
fn delete_with_all_flags_executes() {
    let executor = executor();
    executor
        .store()
        .execute_batch(
            "INSERT INTO companies (symbol, company_name) VALUES ('AAPL', 'Apple Inc.');",
        )
        .unwrap();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());
    let args = DeleteArgs {
        table: Some("companies".to_string()),
        column: Some("symbol".to_string()),
        value: Some("aapl".to_string()),
        yes: true,
    };

    let result = delete(&executor, &mut presenter, &args).unwrap();

    let DriveResult::Executed(outcome) = result else {
        panic!("expected execution, got {result:?}");
    };
    assert_eq!(outcome.rows_affected(), 1);
    assert_eq!(row_count(&executor, "companies"), 0);
}

#[test]
fn delete_prompts_for_missing_column_and_value() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(["company_name", "Nobody", "yes"]);
    let args = DeleteArgs {
        table: Some("companies".to_string()),
        ..DeleteArgs::default()
    };

    let result = delete(&executor, &mut presenter, &args).unwrap();

    let DriveResult::Executed(outcome) = &result else {
        panic!("expected execution, got {result:?}");
    };
    assert!(outcome.is_no_matching_rows());
    assert_eq!(exit_code(&result), ExitCode::SUCCESS);
}

#[test]
fn delete_on_table_without_identity_is_refused() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());
    let args = DeleteArgs {
        table: Some("stock_prices".to_string()),
        column: Some("price".to_string()),
        value: Some("1".to_string()),
        yes: true,
    };

    let err = delete(&executor, &mut presenter, &args).unwrap_err();

    assert!(matches!(
        err,
        CliError::Core(Error {
            kind: ErrorKind::UnsupportedFilterColumn,
            ..
        })
    ));
}

#[test]
fn aborted_operation_exits_with_failure() {
    let executor = executor();
    let mut presenter = ScriptedPresenter::new(Vec::<String>::new());
    let args = insert_args(Vec::new(), false);

    let result = insert(&executor, &mut presenter, &args).unwrap();

    assert_eq!(result, DriveResult::Aborted);
    assert_eq!(exit_code(&result), ExitCode::FAILURE);
}
