//! Client configuration
//!
//! Credentials and the registry address are carried in an explicit
//! [`HubConfig`] handed to the client constructor; nothing reads process-wide
//! state behind the caller's back. `from_env()` exists for callers who want
//! the environment-sourced defaults.

use crate::HubError;
use std::collections::HashMap;
use url::Url;

/// Environment variable holding the registry API key
pub const API_KEY_ENV: &str = "HUB_API_KEY";

/// Environment variable overriding the registry base address
pub const BASE_URL_ENV: &str = "HUB_BASE_URL";

/// Default registry base address
pub const DEFAULT_BASE_URL: &str = "http://localhost:3434";

/// Default remote execution timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for [`HubClient`](crate::HubClient)
///
/// # Example
///
/// ```
/// use hub_client::HubConfig;
///
/// let config = HubConfig::new("https://api.example.com")?
///     .with_api_key("hk-test")
///     .with_timeout_secs(120)
///     .with_env_var("SCRAPER_MODE", Some("headless".to_string()));
/// # Ok::<(), hub_client::HubError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Registry and execution service base address
    pub base_url: Url,

    /// API key sent as a bearer token on every request
    pub api_key: Option<String>,

    /// Remote execution timeout in seconds, forwarded to the server
    pub timeout_secs: u64,

    /// Environment variables forwarded to every pulled action
    ///
    /// `None` values are forwarded as JSON null, matching actions that
    /// accept an unset variable.
    pub env: HashMap<String, Option<String>>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            env: HashMap::new(),
        }
    }
}

impl HubConfig {
    /// Create a configuration pointing at the given base address
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, HubError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| HubError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            base_url,
            ..Self::default()
        })
    }

    /// Build a configuration from the process environment
    ///
    /// Reads the API key from `HUB_API_KEY` and the base address from
    /// `HUB_BASE_URL` (falling back to the default local address). A missing
    /// key is not an error here; `require_api_key` fails at pull time.
    pub fn from_env() -> Result<Self, HubError> {
        let base_url = match std::env::var(BASE_URL_ENV) {
            Ok(url) => Url::parse(&url)
                .map_err(|e| HubError::Config(format!("Invalid {BASE_URL_ENV}: {e}")))?,
            Err(_) => Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        };

        Ok(Self {
            base_url,
            api_key: std::env::var(API_KEY_ENV).ok(),
            ..Self::default()
        })
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the remote execution timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Replace the forwarded environment mapping
    pub fn with_env(mut self, env: HashMap<String, Option<String>>) -> Self {
        self.env = env;
        self
    }

    /// Add a single forwarded environment variable
    pub fn with_env_var(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.env.insert(key.into(), value);
        self
    }

    /// Resolve the API key, failing before any I/O when absent
    pub fn require_api_key(&self) -> Result<&str, HubError> {
        self.api_key.as_deref().ok_or(HubError::MissingApiKey)
    }
}

/// Resolve environment variable references in strings
///
/// Supports `${VAR}` and `$VAR` syntax, used when forwarding environment
/// values like `"${SCRAPER_API_KEY}"` to a pulled action. Expansion is
/// best-effort: a reference that does not resolve is left untouched, so a
/// literal value containing `$` forwards verbatim.
///
/// # Example
///
/// ```
/// # use hub_client::config::resolve_env_string;
/// unsafe { std::env::set_var("TEST_VAR", "test_value"); }
/// let result = resolve_env_string("prefix_${TEST_VAR}_suffix")?;
/// assert_eq!(result, "prefix_test_value_suffix");
/// # Ok::<(), hub_client::HubError>(())
/// ```
pub fn resolve_env_string(s: &str) -> Result<String, HubError> {
    let mut result = s.to_string();

    // Pattern for ${VAR} syntax
    let re_braces = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| HubError::InvalidPattern(e.to_string()))?;

    for cap in re_braces.captures_iter(s) {
        if let Ok(value) = std::env::var(&cap[1]) {
            result = result.replace(&cap[0], &value);
        }
    }

    // Pattern for $VAR syntax (without braces)
    let re_simple = regex::Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)")
        .map_err(|e| HubError::InvalidPattern(e.to_string()))?;

    for cap in re_simple.captures_iter(&result.clone()) {
        if let Ok(value) = std::env::var(&cap[1]) {
            result = result.replace(&cap[0], &value);
        }
    }

    Ok(result)
}

/// Expand `${VAR}` references in every set value of a forwarded env mapping
///
/// `None` values pass through untouched.
pub fn resolve_env_map(
    env: &HashMap<String, Option<String>>,
) -> Result<HashMap<String, Option<String>>, HubError> {
    env.iter()
        .map(|(key, value)| {
            let resolved = match value {
                Some(v) => Some(resolve_env_string(v)?),
                None => None,
            };
            Ok((key.clone(), resolved))
        })
        .collect()
}
