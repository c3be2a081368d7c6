// waypoint-client/src/client.rs
// ============================================================================
// Module: RPC Client
// Description: HTTP caller for Waypoint transport adapters.
// Purpose: Issue query and mutation calls and surface typed errors.
// Dependencies: reqwest, serde_json
// ============================================================================

//! ## Overview
//! [`RpcClient`] posts call envelopes (`{"path": [...], "args": ...}`) to a
//! Waypoint HTTP adapter. Queries go to `/query` and mutations to
//! `/mutation`; the route is how this transport signals the call kind. Every
//! failure — transport-level or server-classified — surfaces as a single
//! [`ClientError`] type so callers branch on the classified kind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

use crate::error::ClientError;

// ============================================================================
// SECTION: RPC Client
// ============================================================================

/// HTTP client for one Waypoint server.
#[derive(Debug, Clone)]
pub struct RpcClient {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// Server base URL without a trailing slash.
    base_url: String,
}

impl RpcClient {
    /// Creates a client for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Issues a query call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures and classified server
    /// failures alike.
    pub async fn query(&self, path: &[&str], args: Value) -> Result<Value, ClientError> {
        self.call("query", path, args).await
    }

    /// Issues a mutation call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for transport failures and classified server
    /// failures alike.
    pub async fn mutate(&self, path: &[&str], args: Value) -> Result<Value, ClientError> {
        self.call("mutation", path, args).await
    }

    /// Posts one call envelope and reconstructs the outcome.
    async fn call(&self, route: &str, path: &[&str], args: Value) -> Result<Value, ClientError> {
        let envelope = json!({ "path": path, "args": args });
        let response = self
            .http
            .post(format!("{}/{route}", self.base_url))
            .json(&envelope)
            .send()
            .await
            .map_err(|err| ClientError::transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if (200..300).contains(&status) {
            return Ok(body.get("result").cloned().unwrap_or(Value::Null));
        }
        Err(ClientError::from_response(Some(status), &body, "request failed"))
    }
}
