//! The agent loop
//!
//! Implements the conversational control flow: call the model with the
//! conversation and the available tools; when the model requests tool calls,
//! execute them through the registry and feed the results back; otherwise
//! return the final answer. Tool failures become error-flagged tool results
//! in the conversation, never loop failures.

use crate::error::{AgentError, Result};
use crate::messages::{ContentBlock, Message};
use crate::model::{ChatModel, StopReason, ToolSpec};
use hub_core::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for the agent loop
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Maximum number of model iterations (prevents infinite tool loops)
    pub max_iterations: usize,

    /// System prompt prepended to every conversation
    pub system_prompt: Option<String>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            system_prompt: None,
        }
    }
}

/// Conversational loop binding a chat model to a tool registry
pub struct AgentLoop {
    model: Arc<dyn ChatModel>,
    tools: Arc<ToolRegistry>,
    config: LoopConfig,
}

impl AgentLoop {
    /// Create a new loop builder
    pub fn builder() -> AgentLoopBuilder {
        AgentLoopBuilder::new()
    }

    /// Run the loop for a single user message
    ///
    /// # Returns
    ///
    /// The model's final text once it stops requesting tools.
    pub async fn run(&self, user_message: String) -> Result<String> {
        let mut conversation = Vec::new();
        if let Some(prompt) = &self.config.system_prompt {
            conversation.push(Message::system(prompt.clone()));
        }
        conversation.push(Message::user(user_message));

        self.run_conversation(conversation).await
    }

    /// Run the loop over an existing conversation
    pub async fn run_conversation(&self, mut conversation: Vec<Message>) -> Result<String> {
        let tool_specs = ToolSpec::from_registry(&self.tools);
        let mut iteration = 0;

        loop {
            iteration += 1;
            if iteration > self.config.max_iterations {
                warn!(
                    max_iterations = self.config.max_iterations,
                    "Max iterations reached, stopping"
                );
                return Ok("Max iterations reached without completion".to_string());
            }

            info!(
                iteration = iteration,
                tool_count = tool_specs.len(),
                "Agent iteration started"
            );

            let turn = self.model.chat(&conversation, &tool_specs).await?;
            conversation.push(turn.message.clone());

            match turn.stop {
                StopReason::EndTurn => {
                    let text = turn.message.text().unwrap_or_default().to_string();
                    info!(iteration = iteration, "Agent completed");
                    return Ok(text);
                }

                StopReason::ToolUse => {
                    let results = self.execute_tools(&turn.message).await;

                    if results.is_empty() {
                        warn!("Model signalled tool use but requested no tool calls");
                        return Ok(turn.message.text().unwrap_or_default().to_string());
                    }

                    for result in results {
                        conversation.push(result);
                    }
                }
            }
        }
    }

    /// Execute every tool call in an assistant message
    ///
    /// Failures (unknown tool, execution error) come back as error-flagged
    /// tool results so the model can react to them in the next turn.
    async fn execute_tools(&self, message: &Message) -> Vec<Message> {
        let mut results = Vec::new();

        for block in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };

            debug!(tool = %name, tool_use_id = %id, "Executing tool");

            let Some(tool) = self.tools.get(name) else {
                warn!(tool = %name, "Tool not found in registry");
                results.push(Message::tool_error(
                    id.clone(),
                    format!("Error: tool not found: {name}"),
                ));
                continue;
            };

            let start = std::time::Instant::now();
            match tool.execute(input.clone()).await {
                Ok(result) => {
                    let content =
                        serde_json::to_string(&result).unwrap_or_else(|_| result.to_string());
                    info!(
                        tool = %name,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Tool execution succeeded"
                    );
                    results.push(Message::tool_result(id.clone(), content));
                }
                Err(e) => {
                    warn!(
                        tool = %name,
                        duration_ms = start.elapsed().as_millis() as u64,
                        error = %e,
                        "Tool execution failed"
                    );
                    results.push(Message::tool_error(id.clone(), format!("Error: {e}")));
                }
            }
        }

        results
    }
}

/// Builder for [`AgentLoop`]
pub struct AgentLoopBuilder {
    model: Option<Arc<dyn ChatModel>>,
    tools: Arc<ToolRegistry>,
    config: LoopConfig,
}

impl AgentLoopBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            model: None,
            tools: Arc::new(ToolRegistry::new()),
            config: LoopConfig::default(),
        }
    }

    /// Set the chat model
    pub fn model(mut self, model: Arc<dyn ChatModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the tool registry
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the maximum number of iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Build the loop
    pub fn build(self) -> Result<AgentLoop> {
        let model = self
            .model
            .ok_or_else(|| AgentError::Builder("Model not set".to_string()))?;

        Ok(AgentLoop {
            model,
            tools: self.tools,
            config: self.config,
        })
    }
}

impl Default for AgentLoopBuilder {
    fn default() -> Self {
        Self::new()
    }
}
