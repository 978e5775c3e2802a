//! Centralized error types for SupplyGraph.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for configuration and input handling.
#[derive(Error, Debug)]
pub enum SupplyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing column '{column}' in {}", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid value for '{field}': {value:?} ({reason})")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Missing required value for '{0}'")]
    MissingField(&'static str),

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for SupplyGraph core operations.
pub type SupplyResult<T> = Result<T, SupplyError>;

impl SupplyError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn invalid(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
