//! Registry client
//!
//! `HubClient::pull` turns a list of repo identifiers into ready-to-call
//! [`ActionProxy`] instances: one catalog fetch carrying all identifiers,
//! then one proxy per action of each repo's first release.

use crate::catalog::{CatalogResponse, decode_catalog};
use crate::config::{HubConfig, resolve_env_map};
use crate::proxy::ActionProxy;
use crate::{HubError, Result};
use hub_core::Tool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Timeout for the catalog metadata fetch
const CATALOG_TIMEOUT_SECS: u64 = 30;

/// Per-pull options overlaying the [`HubConfig`] defaults
///
/// Mirrors the knobs a caller turns per pull: extra forwarded environment,
/// a timeout override, eager session initialization, and an explicit API key.
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Environment merged over the config's forwarded environment
    pub env: HashMap<String, Option<String>>,

    /// Remote timeout override for the pulled actions
    pub timeout_secs: Option<u64>,

    /// Open a remote session per action before returning it
    ///
    /// Session opens run sequentially; the first failure aborts the whole
    /// pull, so no proxies are handed out with half-initialized batchmates.
    pub initialize: bool,

    /// API key override for this pull
    pub api_key: Option<String>,
}

impl PullOptions {
    /// Merge extra forwarded environment variables into this pull
    pub fn env(mut self, env: HashMap<String, Option<String>>) -> Self {
        self.env.extend(env);
        self
    }

    /// Add a single forwarded environment variable
    pub fn env_var(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.env.insert(key.into(), value);
        self
    }

    /// Override the remote timeout for the pulled actions
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Eagerly open a remote session per pulled action
    pub fn initialize(mut self, initialize: bool) -> Self {
        self.initialize = initialize;
        self
    }

    /// Use an explicit API key for this pull
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Client for the remote tool registry
pub struct HubClient {
    config: HubConfig,
    http: reqwest::Client,
}

impl HubClient {
    /// Create a client from an explicit configuration
    pub fn new(config: HubConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(CATALOG_TIMEOUT_SECS))
            .build()
            .map_err(|e| HubError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Pull every action of the requested repos as invokable proxies
    ///
    /// Issues one catalog request carrying all repo identifiers. Repos the
    /// registry does not know produce no proxies and no error, so the result
    /// may be shorter than the request. Any catalog failure, schema error,
    /// or (with `initialize`) session-open failure aborts the whole pull.
    ///
    /// # Arguments
    ///
    /// * `repos` - Repo identifiers, e.g. `"acme/scraper"`
    /// * `opts` - Per-pull overrides; see [`PullOptions`]
    pub async fn pull(&self, repos: &[&str], opts: PullOptions) -> Result<Vec<Arc<ActionProxy>>> {
        // Credential check happens before any network activity.
        let api_key = match &opts.api_key {
            Some(key) => key.clone(),
            None => self.config.require_api_key()?.to_string(),
        };

        let mut env = self.config.env.clone();
        env.extend(opts.env.clone());
        let env = resolve_env_map(&env)?;

        let timeout_secs = opts.timeout_secs.unwrap_or(self.config.timeout_secs);

        let url = releases_url(&self.config.base_url);
        let query: Vec<(&str, &str)> = repos.iter().map(|repo| ("ids", *repo)).collect();

        info!(repos = ?repos, url = %url, "Fetching tool catalog");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| HubError::Catalog(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HubError::Catalog(e.to_string()))?;

        let catalog = decode_catalog(status, &body)?;

        let proxies = build_proxies(
            &catalog,
            &env,
            timeout_secs,
            &api_key,
            &self.config.base_url,
        )?;

        if opts.initialize {
            // Sequential, first-fails-blocks-rest: a session failure aborts
            // the pull rather than handing out a partially initialized batch.
            for proxy in &proxies {
                proxy.start_session().await?;
            }
        }

        info!(count = proxies.len(), "Pulled tools");

        Ok(proxies)
    }
}

/// Catalog endpoint
fn releases_url(base: &Url) -> String {
    format!("{}/v0.2/releases", base.as_str().trim_end_matches('/'))
}

/// Build one proxy per action of each repo's first release
///
/// Pure with respect to the network; schema errors abort the whole batch.
fn build_proxies(
    catalog: &CatalogResponse,
    env: &HashMap<String, Option<String>>,
    timeout_secs: u64,
    api_key: &str,
    base_url: &Url,
) -> Result<Vec<Arc<ActionProxy>>> {
    let mut proxies = Vec::new();

    for repo in &catalog.data {
        // No version negotiation: the first listed release wins.
        let Some(release) = repo.releases.first() else {
            debug!(owner = %repo.owner, repo = %repo.name, "Repo has no releases, skipping");
            continue;
        };

        for action in &release.actions {
            let proxy = ActionProxy::new(
                &repo.owner,
                &repo.name,
                &action.action,
                release.version.clone(),
                &action.description,
                &action.input_schema,
                env.clone(),
                timeout_secs,
                api_key,
                base_url.clone(),
            )?;

            debug!(tool = %proxy.name(), "Built action proxy");
            proxies.push(Arc::new(proxy));
        }
    }

    Ok(proxies)
}
