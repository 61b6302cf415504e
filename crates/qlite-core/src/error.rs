//! Error types.

use std::path::PathBuf;
use thiserror::Error;

use encounter_events::ParseStateKeyError;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    /// A value is outside its meaningful range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}

/// Errors from the value table and its persisted form.
#[derive(Debug, Error)]
pub enum TableError {
    /// `update` was called for a key that was never created
    #[error("no entry for state key {0}")]
    MissingKey(String),
    /// The record's key and value sequences differ in length
    #[error("record has {keys} keys but {values} value vectors")]
    LengthMismatch { keys: usize, values: usize },
    /// A value vector does not have one entry per action
    #[error("value vector for key {key} has {found} entries, expected {expected}")]
    VectorLength {
        key: String,
        found: usize,
        expected: usize,
    },
    /// A key in the record is not a valid state key
    #[error("invalid key at index {index}: {source}")]
    InvalidKey {
        index: usize,
        #[source]
        source: ParseStateKeyError,
    },
    /// Reading or writing the table file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The table file is not valid JSON for a record
    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error for the crate.
#[derive(Debug, Error)]
pub enum QliteError {
    /// Error loading configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Error loading or saving the value table
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}
