//! Registry client for hub-rs
//!
//! This crate pulls remotely-hosted tool definitions from a registry service
//! and wraps each action as an [`ActionProxy`] implementing
//! [`hub_core::Tool`], ready to hand to an agent loop. Each proxy validates
//! its arguments against a schema derived from the catalog entry and executes
//! the action remotely, either per call (stateless) or through a server-side
//! session reused across calls.
//!
//! # Example
//!
//! ```no_run
//! use hub_client::{HubClient, HubConfig, PullOptions};
//!
//! # async fn example() -> hub_client::Result<()> {
//! let config = HubConfig::from_env()?;
//! let client = HubClient::new(config)?;
//!
//! // Fetch every action of the requested repos, opening a remote session
//! // per action so repeated calls skip per-call environment setup.
//! let tools = client
//!     .pull(&["acme/scraper"], PullOptions::default().initialize(true))
//!     .await?;
//!
//! println!("Pulled {} tools", tools.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod proxy;
pub mod schema;

// Re-export commonly used types
pub use catalog::{ActionDefinition, CatalogRepo, CatalogResponse, Release};
pub use client::{HubClient, PullOptions};
pub use config::HubConfig;
pub use error::HubError;
pub use proxy::{ActionProxy, CLIENT_VERSION};
pub use schema::ArgsValidator;

/// Result type for hub-client operations
pub type Result<T> = std::result::Result<T, HubError>;
