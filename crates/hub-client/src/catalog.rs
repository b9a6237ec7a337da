//! Catalog wire types
//!
//! Shapes for the registry's `/v0.2/releases` response. Decoding is factored
//! out of the HTTP call so status handling is testable without a server.

use crate::{HubError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    /// One entry per repo the registry knows about
    ///
    /// Requested repos missing from the catalog simply do not appear here;
    /// the caller gets fewer tools than requested, not an error.
    pub data: Vec<CatalogRepo>,
}

/// A repo entry in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRepo {
    pub owner: String,
    pub name: String,

    /// Published releases, newest first; only the first is used
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// A release of a repo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Remotely-executable actions exposed by this release
    pub actions: Vec<ActionDefinition>,
}

/// One action inside a release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub action: String,
    pub description: String,

    /// JSON-Schema-like input description, kept verbatim
    pub input_schema: Value,
}

/// Decode a catalog fetch response
///
/// Any non-success status aborts the whole pull: no tools are returned and
/// no partial results are kept.
pub fn decode_catalog(status: StatusCode, body: &str) -> Result<CatalogResponse> {
    if !status.is_success() {
        return Err(HubError::Catalog(format!("HTTP {status}: {body}")));
    }

    serde_json::from_str(body)
        .map_err(|e| HubError::Catalog(format!("Failed to parse catalog response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> String {
        json!({
            "data": [{
                "owner": "acme",
                "name": "scraper",
                "releases": [{
                    "version": "1.2.0",
                    "actions": [{
                        "action": "scrape",
                        "description": "Scrape a web page",
                        "input_schema": {
                            "properties": {
                                "url": {"type": "string"}
                            },
                            "required": ["url"]
                        }
                    }]
                }]
            }]
        })
        .to_string()
    }

    #[test]
    fn test_decode_catalog_success() {
        let catalog = decode_catalog(StatusCode::OK, &sample_body()).unwrap();

        assert_eq!(catalog.data.len(), 1);
        let repo = &catalog.data[0];
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "scraper");
        assert_eq!(repo.releases.len(), 1);

        let release = &repo.releases[0];
        assert_eq!(release.version.as_deref(), Some("1.2.0"));
        assert_eq!(release.actions.len(), 1);
        assert_eq!(release.actions[0].action, "scrape");
    }

    #[test]
    fn test_decode_catalog_server_error() {
        let result = decode_catalog(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        match result {
            Err(HubError::Catalog(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("boom"));
            }
            other => panic!("Expected Catalog error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_catalog_unauthorized() {
        let result = decode_catalog(StatusCode::UNAUTHORIZED, "{\"error\":\"bad key\"}");
        assert!(matches!(result, Err(HubError::Catalog(_))));
    }

    #[test]
    fn test_decode_catalog_malformed_body() {
        let result = decode_catalog(StatusCode::OK, "not json");
        assert!(matches!(result, Err(HubError::Catalog(_))));
    }

    #[test]
    fn test_release_without_version() {
        let body = json!({
            "data": [{
                "owner": "acme",
                "name": "scraper",
                "releases": [{
                    "actions": []
                }]
            }]
        })
        .to_string();

        let catalog = decode_catalog(StatusCode::OK, &body).unwrap();
        assert!(catalog.data[0].releases[0].version.is_none());
    }

    #[test]
    fn test_repo_without_releases() {
        let body = json!({
            "data": [{
                "owner": "acme",
                "name": "empty"
            }]
        })
        .to_string();

        let catalog = decode_catalog(StatusCode::OK, &body).unwrap();
        assert!(catalog.data[0].releases.is_empty());
    }
}
