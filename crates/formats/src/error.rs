//! Error types for dataset readers

use thiserror::Error;

/// Ingestion errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("Duplicate record id {0} in batch")]
    DuplicateId(i64),
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;
