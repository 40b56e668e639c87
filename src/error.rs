//! Error handling for dataset ingestion and configuration.
//!
//! Only startup conditions are errors. Per-interaction conditions such as
//! an unknown station or an empty selection are represented as data.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Column '{column}' missing from dataset header: {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Malformed field '{column}' at row {row} in {path}: {reason}")]
    MalformedField {
        path: PathBuf,
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Invalid selection event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ExplorerError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
