use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across the crate.
pub type EdaResult<T> = Result<T, EdaError>;

/// Error type returned by loading, profiling, and schema-derivation functions.
///
/// A single error enum is shared by every operation; reporting-only operations
/// (null overlap, duplicates) only ever produce [`EdaError::UnknownColumn`].
#[derive(Debug, Error)]
pub enum EdaError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error (schema files, summaries).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The folder glob pattern could not be built.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A matched directory entry could not be read.
    #[error("cannot read directory entry: {0}")]
    Glob(#[from] glob::GlobError),

    /// The input does not conform to the provided schema (missing columns, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A column name passed to an operation is not present in the table.
    #[error("unknown column '{column}'. available={available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// A file name does not follow the configured naming convention.
    #[error("file name '{name}' does not follow the naming convention: {message}")]
    NamingConvention { name: String, message: String },

    /// A path has no usable file name component.
    #[error("path has no file name: {}", .0.display())]
    NoFileName(PathBuf),
}
