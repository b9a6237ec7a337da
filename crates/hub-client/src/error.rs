//! Error types for registry and proxy operations

use thiserror::Error;

/// Errors that can occur while pulling or invoking remote tools
#[derive(Error, Debug)]
pub enum HubError {
    /// No API key available (explicit argument or configuration)
    ///
    /// Raised synchronously before any network activity.
    #[error("Missing hub API key")]
    MissingApiKey,

    /// Catalog fetch failed
    ///
    /// A non-success status or undecodable body aborts the whole pull;
    /// there are no partial results.
    #[error("Can't load tools: {0}")]
    Catalog(String),

    /// Malformed or unsupported action input schema
    #[error("Invalid input schema: {0}")]
    Schema(String),

    /// Arguments rejected by the derived schema
    ///
    /// Raised before any network call is made for the invocation.
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// Session open or close failed
    #[error("Session error: {0}")]
    Session(String),

    /// Remote execution failed
    ///
    /// Wraps any transport or non-JSON response during a per-call
    /// invocation. Recoverable per call: the proxy stays usable.
    #[error("Tool execution failed: {0}")]
    Execution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid expansion pattern
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Convert HubError to hub_core::Error
///
/// Execution failures cross the Tool-trait seam as recoverable tool errors.
impl From<HubError> for hub_core::Error {
    fn from(err: HubError) -> Self {
        hub_core::Error::ExecutionFailed(err.to_string())
    }
}
