//! Tool registry for managing available tools

use crate::Tool;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry mapping tool names to tool instances
///
/// The agent loop looks tools up by the name the model requested; pulled
/// action proxies are registered here before the loop starts.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name
    ///
    /// Registering a second tool with the same name replaces the first.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().unwrap();
        tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap();
        tools.get(name).cloned()
    }

    /// List all registered tools
    ///
    /// Useful for building the tool specifications handed to the model.
    pub fn list_tools(&self) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap();
        tools.values().cloned().collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().unwrap();
        tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        let tools = self.tools.read().unwrap();
        tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct EchoTool {
        name: String,
    }

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, args: Value) -> Result<Value> {
            Ok(args)
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Echoes its input"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoTool {
            name: "echo".to_string(),
        }));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool {
            name: "echo".to_string(),
        }));
        registry.register(Arc::new(EchoTool {
            name: "echo".to_string(),
        }));

        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_through_registry() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool {
            name: "echo".to_string(),
        }));

        let tool = registry.get("echo").unwrap();
        let out = tool.execute(json!({"x": 1})).await.unwrap();
        assert_eq!(out, json!({"x": 1}));
    }
}
