//! Error types for the degscope library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::{DatasetKind, StandardColumn};

/// Main error type for degscope operations.
#[derive(Debug, Error)]
pub enum DegscopeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing CSV/TSV data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
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

    /// Required canonical columns have no mapping entry.
    #[error("{kind} table is missing required columns: {}", format_columns(.missing))]
    Schema {
        kind: DatasetKind,
        missing: Vec<StandardColumn>,
    },

    /// A mapping entry points at a column the table does not have.
    #[error("Mapping for '{canonical}' refers to unknown column '{source_column}'")]
    Mapping {
        canonical: StandardColumn,
        source_column: String,
    },

    /// Malformed filter criteria or arguments.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Multi-dataset comparison could not be performed.
    #[error("Comparison error: {0}")]
    Comparison(String),

    /// Statistical input that has no sentinel result.
    #[error("Computation error: {0}")]
    Computation(String),

    /// Error saving or loading a dataset snapshot.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

fn format_columns(columns: &[StandardColumn]) -> String {
    columns
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for degscope operations.
pub type Result<T> = std::result::Result<T, DegscopeError>;
