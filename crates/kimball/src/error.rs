//! Error types for the KIMBALL library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for KIMBALL operations.
///
/// The modeling engine itself never fails on bad data; these errors come from
/// the store layer, configuration loading, and persistence.
#[derive(Debug, Error)]
pub enum KimballError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store has no table with this name.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The store has no such column in the table.
    #[error("Column not found: {table}.{column}")]
    ColumnNotFound { table: String, column: String },

    /// Failure saving or loading a model build.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for KIMBALL operations.
pub type Result<T> = std::result::Result<T, KimballError>;
