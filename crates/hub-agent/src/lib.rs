//! Example agent loop for hub-rs
//!
//! Wires tools from a [`hub_core::ToolRegistry`] into a conversation with a
//! chat model: the model is called with the conversation and the available
//! tool specifications, requested tool calls are executed through the
//! registry, and results (including per-call failures) are fed back into the
//! conversation until the model stops asking for tools.
//!
//! The model itself is behind the [`ChatModel`] seam; this crate ships no
//! production provider.

pub mod agent_loop;
pub mod error;
pub mod messages;
pub mod model;

pub use agent_loop::{AgentLoop, AgentLoopBuilder, LoopConfig};
pub use error::{AgentError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use model::{ChatModel, ChatTurn, StopReason, ToolSpec};
