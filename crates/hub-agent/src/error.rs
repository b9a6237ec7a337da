//! Error types for the agent loop

use thiserror::Error;

/// Result type alias for hub-agent
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors surfaced by the agent loop
///
/// Tool failures are not errors at this level: they are fed back into the
/// conversation as error-flagged tool results.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The chat model call failed
    #[error("Model error: {0}")]
    Model(String),

    /// The loop was built without a required component
    #[error("Agent loop not configured: {0}")]
    Builder(String),
}
