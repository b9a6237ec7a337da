//! Core abstractions for hub-rs
//!
//! This crate defines the `Tool` trait that action proxies implement, the
//! registry used to hand tools to an agent loop, and the shared error type.

pub mod error;
pub mod logging;
pub mod registry;
pub mod tool;

pub use error::{Error, Result};
pub use registry::ToolRegistry;
pub use tool::Tool;
