//! Error types for hub-core

use thiserror::Error;

/// Result type alias for hub-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tool operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Tool initialization failed
    #[error("Tool initialization failed: {0}")]
    InitializationFailed(String),

    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}
