//! Action proxy: one invokable handle per remote action
//!
//! A proxy validates arguments against its derived schema, then executes the
//! action remotely. Two addressing modes exist, selected by the presence of a
//! session identifier: stateless calls hit the per-action endpoint and carry
//! the forwarded environment; session-bound calls hit the session endpoint
//! and omit it (the session already holds the environment server-side).

use crate::schema::ArgsValidator;
use crate::{HubError, Result};
use async_trait::async_trait;
use hub_core::Tool;
use reqwest::StatusCode;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Version tag sent with every remote call
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Slack added on top of the remote timeout for the local HTTP client
///
/// The server enforces `timeout` on the action itself; the local bound only
/// keeps a dead connection from hanging the caller forever.
const LOCAL_TIMEOUT_SLACK_SECS: u64 = 10;

/// Proxy for one remote action
///
/// Identity (owner, repo, action) is immutable after construction; the only
/// mutable state is the session identifier, guarded by a mutex so concurrent
/// callers on one proxy cannot race session changes.
pub struct ActionProxy {
    name: String,
    owner: String,
    repo: String,
    action: String,
    version: Option<String>,
    description: String,

    validator: ArgsValidator,
    env: HashMap<String, Option<String>>,
    timeout_secs: u64,
    api_key: String,
    base_url: Url,

    /// HTTP client with a bounded local timeout
    http: reqwest::Client,

    /// Remote session identifier, when a session is open
    session_id: Mutex<Option<String>>,
}

impl ActionProxy {
    /// Construct a proxy for one catalog action
    ///
    /// Derives the argument validator from `input_schema`; a malformed or
    /// unsupported schema fails construction.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        action: impl Into<String>,
        version: Option<String>,
        description: impl Into<String>,
        input_schema: &Value,
        env: HashMap<String, Option<String>>,
        timeout_secs: u64,
        api_key: impl Into<String>,
        base_url: Url,
    ) -> Result<Self> {
        let owner = owner.into();
        let repo = repo.into();
        let action = action.into();

        let validator = ArgsValidator::from_schema(input_schema)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs + LOCAL_TIMEOUT_SLACK_SECS))
            .build()
            .map_err(|e| HubError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name: format!("{owner}__{repo}__{action}"),
            owner,
            repo,
            action,
            version,
            description: description.into(),
            validator,
            env,
            timeout_secs,
            api_key: api_key.into(),
            base_url,
            http,
            session_id: Mutex::new(None),
        })
    }

    /// Repo owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repo name
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Action name within the repo
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Release version the action came from, when the catalog supplied one
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Current session identifier, if a session is open
    pub async fn session_id(&self) -> Option<String> {
        self.session_id.lock().await.clone()
    }

    /// Invoke the action remotely
    ///
    /// Arguments are validated and defaults filled before any network
    /// activity. The response body is returned as-is: the proxy does not
    /// validate output. Transport and decode failures surface as
    /// [`HubError::Execution`], recoverable per call.
    pub async fn invoke(&self, args: Value) -> Result<Value> {
        let args = match args {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(HubError::Validation(format!(
                    "Arguments must be a JSON object, got {other}"
                )));
            }
        };

        let args = self.validator.validate(&args)?;

        let session = self.session_id.lock().await.clone();
        let (url, body) = self.plan_request(&args, session.as_deref());

        debug!(
            tool = %self.name,
            session = session.is_some(),
            url = %url,
            "Invoking remote action"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| HubError::Execution(e.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| HubError::Execution(e.to_string()))?;

        Ok(payload)
    }

    /// Pick endpoint and payload for an invocation
    ///
    /// Addressing mode is selected by the presence of a session identifier:
    /// session-bound calls hit the session endpoint and omit the environment.
    fn plan_request(&self, args: &Map<String, Value>, session: Option<&str>) -> (String, Value) {
        match session {
            Some(session_id) => (
                session_invoke_url(&self.base_url, session_id, &self.action),
                session_invoke_body(args, self.timeout_secs),
            ),
            None => (
                invoke_url(&self.base_url, &self.owner, &self.repo, &self.action),
                invoke_body(args, &self.env, self.timeout_secs),
            ),
        }
    }

    /// Open a remote session for this proxy
    ///
    /// Later invocations switch to the session-scoped endpoint and stop
    /// forwarding the environment per call. Not idempotent: calling twice
    /// opens a second server-side session and overwrites the stored
    /// identifier.
    pub async fn start_session(&self) -> Result<Value> {
        let url = session_url(&self.base_url, &self.owner, &self.repo);
        let body = session_open_body(&self.env, self.timeout_secs);

        debug!(tool = %self.name, url = %url, "Opening remote session");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| HubError::Session(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HubError::Session(e.to_string()))?;

        let (payload, session_id) = decode_session_response(status, &text)?;

        info!(tool = %self.name, session_id = %session_id, "Session opened");

        let mut guard = self.session_id.lock().await;
        if guard.replace(session_id).is_some() {
            warn!(tool = %self.name, "Previous session identifier overwritten");
        }

        Ok(payload)
    }

    /// Close the remote session, if one is open
    ///
    /// Issues an explicit DELETE carrying the session identifier and clears
    /// the stored id on success. A proxy without a session returns `Ok(())`.
    /// Dropping a proxy does not close its session; callers own the
    /// session's lifetime.
    pub async fn close_session(&self) -> Result<()> {
        let mut guard = self.session_id.lock().await;
        let Some(session_id) = guard.clone() else {
            return Ok(());
        };

        let url = session_url(&self.base_url, &self.owner, &self.repo);

        debug!(tool = %self.name, session_id = %session_id, "Closing remote session");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "session_id": session_id }))
            .send()
            .await
            .map_err(|e| HubError::Session(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HubError::Session(format!(
                "Failed to close session: HTTP {status}: {body}"
            )));
        }

        *guard = None;
        Ok(())
    }
}

#[async_trait]
impl Tool for ActionProxy {
    async fn execute(&self, args: Value) -> hub_core::Result<Value> {
        self.invoke(args).await.map_err(Into::into)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        // The catalog's schema, verbatim, not a re-derived shape
        self.validator.raw_schema().clone()
    }
}

/// Stateless per-call endpoint
pub(crate) fn invoke_url(base: &Url, owner: &str, repo: &str, action: &str) -> String {
    format!(
        "{}/v1/{owner}/{repo}/{action}",
        base.as_str().trim_end_matches('/')
    )
}

/// Session-scoped call endpoint
pub(crate) fn session_invoke_url(base: &Url, session_id: &str, action: &str) -> String {
    format!(
        "{}/v1/sessions/{session_id}/{action}",
        base.as_str().trim_end_matches('/')
    )
}

/// Session open/close endpoint (trailing slash is part of the protocol)
pub(crate) fn session_url(base: &Url, owner: &str, repo: &str) -> String {
    format!("{}/v1/{owner}/{repo}/", base.as_str().trim_end_matches('/'))
}

/// Body for a stateless call: arguments plus the full environment
pub(crate) fn invoke_body(
    args: &Map<String, Value>,
    env: &HashMap<String, Option<String>>,
    timeout_secs: u64,
) -> Value {
    json!({
        "args": args,
        "env": env,
        "timeout": timeout_secs,
        "client_version": CLIENT_VERSION,
    })
}

/// Body for a session-bound call: no environment, the session carries it
pub(crate) fn session_invoke_body(args: &Map<String, Value>, timeout_secs: u64) -> Value {
    json!({
        "args": args,
        "timeout": timeout_secs,
        "client_version": CLIENT_VERSION,
    })
}

/// Body for a session open
pub(crate) fn session_open_body(env: &HashMap<String, Option<String>>, timeout_secs: u64) -> Value {
    json!({
        "env": env,
        "timeout": timeout_secs,
        "client_version": CLIENT_VERSION,
    })
}

/// Decode a session-open response into (payload, session identifier)
pub(crate) fn decode_session_response(status: StatusCode, body: &str) -> Result<(Value, String)> {
    if !status.is_success() {
        return Err(HubError::Session(format!(
            "Failed to initialize session: HTTP {status}: {body}"
        )));
    }

    let payload: Value = serde_json::from_str(body)
        .map_err(|e| HubError::Session(format!("Failed to parse session response: {e}")))?;

    let session_id = payload["data"]["session_id"]
        .as_str()
        .ok_or_else(|| HubError::Session("Response has no data.session_id".to_string()))?
        .to_string();

    Ok((payload, session_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_proxy(base: &str) -> ActionProxy {
        let schema = json!({
            "properties": {
                "url": {"type": "string"},
                "depth": {"type": "integer"}
            },
            "required": ["url"]
        });

        ActionProxy::new(
            "acme",
            "scraper",
            "scrape",
            Some("1.2.0".to_string()),
            "Scrape a web page",
            &schema,
            HashMap::from([("MODE".to_string(), Some("fast".to_string()))]),
            60,
            "hk-test",
            Url::parse(base).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_tool_metadata() {
        let proxy = test_proxy("http://localhost:3434");

        assert_eq!(proxy.name(), "acme__scraper__scrape");
        assert_eq!(proxy.description(), "Scrape a web page");
        assert_eq!(proxy.owner(), "acme");
        assert_eq!(proxy.repo(), "scraper");
        assert_eq!(proxy.action(), "scrape");
        assert_eq!(proxy.version(), Some("1.2.0"));
    }

    #[test]
    fn test_input_schema_round_trips_verbatim() {
        let schema = json!({
            "properties": {"url": {"type": "string", "description": "Page"}},
            "required": ["url"],
            "additionalProperties": true
        });

        let proxy = ActionProxy::new(
            "acme",
            "scraper",
            "scrape",
            None,
            "d",
            &schema,
            HashMap::new(),
            60,
            "hk-test",
            Url::parse("http://localhost:3434").unwrap(),
        )
        .unwrap();

        assert_eq!(proxy.input_schema(), schema);
        assert_eq!(
            serde_json::to_string(&proxy.input_schema()).unwrap(),
            serde_json::to_string(&schema).unwrap()
        );
    }

    #[test]
    fn test_malformed_schema_fails_construction() {
        let result = ActionProxy::new(
            "acme",
            "scraper",
            "scrape",
            None,
            "d",
            &json!({"properties": {"x": {"type": "object"}}}),
            HashMap::new(),
            60,
            "hk-test",
            Url::parse("http://localhost:3434").unwrap(),
        );

        assert!(matches!(result, Err(HubError::Schema(_))));
    }

    #[test]
    fn test_stateless_endpoint_and_body() {
        let base = Url::parse("http://localhost:3434").unwrap();
        let url = invoke_url(&base, "acme", "scraper", "scrape");
        assert_eq!(url, "http://localhost:3434/v1/acme/scraper/scrape");

        let mut args = Map::new();
        args.insert("url".to_string(), json!("https://example.com"));
        let env = HashMap::from([("MODE".to_string(), Some("fast".to_string()))]);

        let body = invoke_body(&args, &env, 60);
        assert_eq!(body["args"]["url"], "https://example.com");
        assert_eq!(body["env"]["MODE"], "fast");
        assert_eq!(body["timeout"], 60);
        assert_eq!(body["client_version"], CLIENT_VERSION);
    }

    #[test]
    fn test_session_endpoint_omits_env() {
        let base = Url::parse("http://localhost:3434/").unwrap();
        let url = session_invoke_url(&base, "sess-123", "scrape");
        assert_eq!(url, "http://localhost:3434/v1/sessions/sess-123/scrape");

        let body = session_invoke_body(&Map::new(), 60);
        assert!(body.get("env").is_none());
        assert_eq!(body["timeout"], 60);
        assert_eq!(body["client_version"], CLIENT_VERSION);
    }

    #[test]
    fn test_plan_request_switches_on_session() {
        let proxy = test_proxy("http://localhost:3434");
        let mut args = Map::new();
        args.insert("url".to_string(), json!("https://example.com"));

        let (url, body) = proxy.plan_request(&args, None);
        assert_eq!(url, "http://localhost:3434/v1/acme/scraper/scrape");
        assert_eq!(body["env"]["MODE"], "fast");

        let (url, body) = proxy.plan_request(&args, Some("sess-9"));
        assert_eq!(url, "http://localhost:3434/v1/sessions/sess-9/scrape");
        assert!(body.get("env").is_none());
        assert_eq!(body["args"]["url"], "https://example.com");
    }

    #[test]
    fn test_session_open_url_has_trailing_slash() {
        let base = Url::parse("http://localhost:3434").unwrap();
        assert_eq!(
            session_url(&base, "acme", "scraper"),
            "http://localhost:3434/v1/acme/scraper/"
        );
    }

    #[test]
    fn test_decode_session_response_success() {
        let body = json!({"data": {"session_id": "sess-123"}}).to_string();
        let (payload, session_id) = decode_session_response(StatusCode::OK, &body).unwrap();

        assert_eq!(session_id, "sess-123");
        assert_eq!(payload["data"]["session_id"], "sess-123");
    }

    #[test]
    fn test_decode_session_response_forbidden() {
        let result = decode_session_response(StatusCode::FORBIDDEN, "denied");
        match result {
            Err(HubError::Session(msg)) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("denied"));
            }
            other => panic!("Expected Session error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_session_response_missing_id() {
        let body = json!({"data": {}}).to_string();
        let result = decode_session_response(StatusCode::OK, &body);
        assert!(matches!(result, Err(HubError::Session(_))));
    }

    #[tokio::test]
    async fn test_invoke_validates_before_network() {
        // Unroutable base address: a Validation error proves the argument
        // check fired before any request was attempted.
        let proxy = test_proxy("http://192.0.2.1:1");

        let result = proxy.invoke(json!({"depth": 3})).await;
        match result {
            Err(HubError::Validation(msg)) => assert!(msg.contains("url")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invoke_rejects_non_object_args() {
        let proxy = test_proxy("http://192.0.2.1:1");

        let result = proxy.invoke(json!([1, 2, 3])).await;
        assert!(matches!(result, Err(HubError::Validation(_))));
    }

    #[tokio::test]
    async fn test_session_id_starts_empty_and_close_is_noop() {
        let proxy = test_proxy("http://192.0.2.1:1");

        assert!(proxy.session_id().await.is_none());
        // No session held: close does not touch the network.
        proxy.close_session().await.unwrap();
    }
}
