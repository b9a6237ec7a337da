//! Tool trait definition

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that an agent loop can invoke by name
///
/// Each tool carries a name, a human-readable description, and a JSON schema
/// describing its input. The agent loop sends name/description/schema to the
/// language model and routes tool calls back through `execute`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with the given arguments
    ///
    /// # Arguments
    ///
    /// * `args` - Tool input as a JSON value (should match `input_schema`)
    ///
    /// # Returns
    ///
    /// Tool output as a JSON value. Failures are recoverable per call: the
    /// agent loop is expected to feed the error message back into the
    /// conversation rather than abort.
    async fn execute(&self, args: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a `ToolRegistry`.
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the model decide when to use this tool.
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;
}
