//! Error types for batch evaluation

use thiserror::Error;

/// Core evaluation errors
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Filter(#[from] descwatch_filters::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
