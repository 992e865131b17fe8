//! Module: dealdesk-config
//! Responsibility: load and validate the TOML configuration shared by the
//! dealdesk tools.
//!
//! ```toml
//! [store]
//! path = "dealdesk.db"
//! create_if_missing = false
//!
//! [session]
//! debug = false
//! strict_booleans = false
//!
//! [shell]
//! history_size = 1000
//! output = "text"          # text | json
//! ```


use serde::{Deserialize, Serialize};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// Constants
///

/// Picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "dealdesk.toml";

pub const DEFAULT_DB_PATH: &str = "dealdesk.db";

pub const DEFAULT_HISTORY_SIZE: usize = 1000;

pub const MAX_HISTORY_SIZE: usize = 100_000;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub session: SessionConfig,
    pub shell: ShellConfig,
}

impl Config {
    /// Load and validate a config file that must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(path, &contents)
    }

    /// Load `path` when given; otherwise `dealdesk.toml` in the working
    /// directory if present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse TOML text; `origin` only labels errors.
    pub fn parse(origin: &Path, contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source: Box::new(source),
        })?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store.path must not be empty".to_string()));
        }

        let history = self.shell.history_size;
        if history == 0 || history > MAX_HISTORY_SIZE {
            return Err(ConfigError::Invalid(format!(
                "shell.history_size must be between 1 and {MAX_HISTORY_SIZE}, got {history}"
            )));
        }

        Ok(())
    }
}

///
/// StoreConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite database file.
    pub path: PathBuf,

    /// Create the database file when it does not exist yet.
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            create_if_missing: false,
        }
    }
}

///
/// SessionConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Log built statements and their bound values.
    pub debug: bool,

    /// Only accept 1/0, true/false, yes/no for boolean columns.
    pub strict_booleans: bool,
}

///
/// ShellConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    pub history_size: usize,
    pub output: OutputFormat,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            history_size: DEFAULT_HISTORY_SIZE,
            output: OutputFormat::default(),
        }
    }
}

///
/// OutputFormat
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text => "text",
            Self::Json => "json",
        };
        write!(f, "{label}")
    }
}
