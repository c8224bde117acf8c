//! Centralized error handling for dashmart.
//!
//! All fallible operations return [`Result`]. Errors are fail-fast: a schema
//! build either completes entirely or aborts without exposing partial tables.

use std::fmt;

/// Main error type for dashmart operations.
#[derive(Debug)]
pub enum DashmartError {
    /// I/O errors (file operations, log directories, etc.)
    Io(std::io::Error),

    /// Data processing errors (Polars, column access, parsing)
    DataProcessing(String),

    /// DuckDB operation errors
    Database(String),

    /// Configuration errors (JSON parsing, missing fields)
    Config(String),

    /// Unrecognized file extension on a dataset path
    UnsupportedFormat(String),

    /// Negative categorical threshold supplied to metadata inference
    InvalidThreshold(i64),

    /// A categorical value in the dataset has no entry in its dimension table.
    /// This is a caller contract violation, not a recoverable data error.
    InconsistentDimension { column: String, value: String },

    /// Generic error with context
    Other(String),
}

impl fmt::Display for DashmartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Database(msg) => write!(f, "Database error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::UnsupportedFormat(ext) => {
                write!(f, "Unsupported file format: '{ext}'")
            }
            Self::InvalidThreshold(value) => {
                write!(f, "Categorical threshold must be non-negative, got {value}")
            }
            Self::InconsistentDimension { column, value } => write!(
                f,
                "Value '{value}' in column '{column}' has no dimension table entry"
            ),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DashmartError {}

impl From<std::io::Error> for DashmartError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<polars::error::PolarsError> for DashmartError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<duckdb::Error> for DashmartError {
    fn from(err: duckdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DashmartError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<anyhow::Error> for DashmartError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for dashmart operations.
pub type Result<T> = std::result::Result<T, DashmartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashmartError::UnsupportedFormat("xlsx".to_owned());
        assert_eq!(err.to_string(), "Unsupported file format: 'xlsx'");
    }

    #[test]
    fn test_inconsistent_dimension_display() {
        let err = DashmartError::InconsistentDimension {
            column: "category".to_owned(),
            value: "Z".to_owned(),
        };
        assert!(err.to_string().contains("category"));
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn test_invalid_threshold_display() {
        let err = DashmartError::InvalidThreshold(-3);
        assert!(err.to_string().contains("-3"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "data.csv");
        let err: DashmartError = io_err.into();
        assert!(matches!(err, DashmartError::Io(_)));
    }
}
