//! Chat model seam
//!
//! The agent loop talks to the language model through [`ChatModel`]; a
//! production provider lives outside this crate.

use crate::messages::Message;
use crate::Result;
use async_trait::async_trait;
use hub_core::ToolRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool specification handed to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name (must match the tool in the registry)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolSpec {
    /// Create a new tool specification
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Build specifications for every tool in a registry
    pub fn from_registry(registry: &ToolRegistry) -> Vec<Self> {
        registry
            .list_tools()
            .iter()
            .map(|tool| Self::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }
}

/// Why the model stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Natural completion; the conversation turn is finished
    EndTurn,
    /// The model requested one or more tool calls
    ToolUse,
}

/// One turn of model output
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The assistant message produced by the model
    pub message: Message,

    /// Why the model stopped
    pub stop: StopReason,
}

/// Trait for chat models that support tool use
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate the next assistant turn
    ///
    /// # Arguments
    ///
    /// * `messages` - The conversation so far, system message included
    /// * `tools` - Specifications of the tools the model may call
    async fn chat(&self, messages: &[Message], tools: &[ToolSpec]) -> Result<ChatTurn>;

    /// Get the model's name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::{Result as CoreResult, Tool};
    use serde_json::json;
    use std::sync::Arc;

    struct StubTool;

    #[async_trait]
    impl Tool for StubTool {
        async fn execute(&self, _args: Value) -> CoreResult<Value> {
            Ok(json!({"ok": true}))
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn description(&self) -> &str {
            "A stub tool"
        }

        fn input_schema(&self) -> Value {
            json!({"properties": {"q": {"type": "string"}}, "required": ["q"]})
        }
    }

    #[test]
    fn test_specs_from_registry() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(StubTool));

        let specs = ToolSpec::from_registry(&registry);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "stub");
        assert_eq!(specs[0].description, "A stub tool");
        assert_eq!(specs[0].input_schema["required"][0], "q");
    }
}
