//! Conversational demo wiring pulled tools into the agent loop
//!
//! Pulls every action of a registry repo, opens a remote session per action,
//! and runs the loop with a scripted model standing in for a real provider
//! (wire your own `ChatModel` implementation where `ScriptedModel` sits).
//!
//! Requires a registry reachable at `HUB_BASE_URL` and `HUB_API_KEY` set.

use async_trait::async_trait;
use hub_agent::{
    AgentLoop, ChatModel, ChatTurn, ContentBlock, Message, Result as AgentResult, StopReason,
    ToolSpec,
};
use hub_client::{HubClient, HubConfig, PullOptions};
use hub_core::{Tool, ToolRegistry};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stand-in model: first turn calls the first available tool, second turn
/// wraps up. A production setup implements `ChatModel` against a real
/// provider instead.
#[derive(Default)]
struct ScriptedModel {
    turns: AtomicUsize,
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, messages: &[Message], tools: &[ToolSpec]) -> AgentResult<ChatTurn> {
        let turn = self.turns.fetch_add(1, Ordering::SeqCst);

        if turn == 0 && !tools.is_empty() {
            return Ok(ChatTurn {
                message: Message::assistant_blocks(vec![ContentBlock::ToolUse {
                    id: "tu-demo-1".to_string(),
                    name: tools[0].name.clone(),
                    input: serde_json::json!({}),
                }]),
                stop: StopReason::ToolUse,
            });
        }

        let last = messages
            .last()
            .and_then(Message::text)
            .unwrap_or("(no result)");

        Ok(ChatTurn {
            message: Message::assistant(format!("Tool run finished. Last result: {last}")),
            stop: StopReason::EndTurn,
        })
    }

    fn name(&self) -> &str {
        "scripted-demo"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hub_core::logging::init_tracing();

    let config = HubConfig::from_env()?;
    let client = HubClient::new(config)?;

    // Pull the repo's actions, forwarding the environment its actions need
    // and opening a session per action so repeated calls reuse the setup.
    let tools = client
        .pull(
            &["scrapegraph/scrapegraphai"],
            PullOptions::default()
                .env_var(
                    "SCRAPEGRAPH_LLM_MODEL",
                    Some("openai/gpt-4o-mini".to_string()),
                )
                .env_var(
                    "SCRAPEGRAPH_LLM_API_KEY",
                    std::env::var("OPENAI_API_KEY").ok(),
                )
                .initialize(true)
                .timeout_secs(360),
        )
        .await?;

    println!("Pulled {} tools:", tools.len());
    for tool in &tools {
        println!("  {} ({})", tool.name(), tool.description());
    }

    let registry = Arc::new(ToolRegistry::new());
    for tool in &tools {
        registry.register(tool.clone());
    }

    let agent = AgentLoop::builder()
        .model(Arc::new(ScriptedModel::default()))
        .tools(registry)
        .system_prompt("Be a helpful assistant.")
        .build()?;

    let answer = agent
        .run("Summarize the content of https://example.com".to_string())
        .await?;

    println!("\n{answer}");

    // Sessions are owned by the caller: close them explicitly.
    for tool in &tools {
        tool.close_session().await?;
    }

    Ok(())
}
