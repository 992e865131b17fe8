use dealdesk_config::ConfigError;
use dealdesk_core::error::Error as CoreError;
use rustyline::error::ReadlineError;
use thiserror::Error as ThisError;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", .0.display_with_kind())]
    Core(#[from] CoreError),

    #[error("input error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}
