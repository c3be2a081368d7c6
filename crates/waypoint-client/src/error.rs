// waypoint-client/src/error.rs
// ============================================================================
// Module: Client Error Reconstruction
// Description: Typed error objects rebuilt from wire envelopes.
// Purpose: Let callers branch on classified kinds without trusting the wire.
// Dependencies: waypoint-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A received error envelope has an unknown, possibly partial shape.
//! Reconstruction never fails: an unrecognized code degrades to the internal
//! server error kind, a missing message falls back through the stringified
//! body to a supplied default, the field path is kept only for input-class
//! failures, and the formatter output rides along opaquely in `data`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;
use waypoint_core::ErrorKind;

// ============================================================================
// SECTION: Client Error
// ============================================================================

/// Typed error reconstructed from a wire-level envelope.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct ClientError {
    /// Transport status, when the transport reported one.
    status: Option<u16>,
    /// Classified kind; unrecognized codes degrade to internal server error.
    code: ErrorKind,
    /// Human-readable message after the fallback chain.
    message: String,
    /// Field path, kept only for input-class failures.
    path: Option<String>,
    /// Formatter output, opaque to the client.
    data: Option<Value>,
}

impl ClientError {
    /// Reconstructs a typed error from a response body of unknown shape.
    ///
    /// Never fails; malformed envelopes degrade to the documented defaults.
    #[must_use]
    pub fn from_response(status: Option<u16>, body: &Value, default_message: &str) -> Self {
        let shape = body.get("error");
        let code = shape
            .and_then(|error| error.get("code"))
            .and_then(Value::as_str)
            .and_then(ErrorKind::parse)
            .unwrap_or(ErrorKind::InternalServerError);
        let message = shape
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| stringify_unknown(body))
            .unwrap_or_else(|| default_message.to_string());
        let path = if code.is_input() {
            shape
                .and_then(|error| error.get("path"))
                .and_then(Value::as_str)
                .map(str::to_string)
        } else {
            None
        };
        let data = shape.and_then(|error| error.get("data")).cloned();
        Self {
            status,
            code,
            message,
            path,
            data,
        }
    }

    /// Creates a transport-level failure that never reached the server.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            code: ErrorKind::InternalServerError,
            message: message.into(),
            path: None,
            data: None,
        }
    }

    /// Returns the transport status, when available.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the classified kind.
    #[must_use]
    pub const fn code(&self) -> ErrorKind {
        self.code
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path for input-class failures.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the opaque formatter output.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

/// Stringifies an unknown body for the message fallback chain.
///
/// A null body carries no information and falls through to the default.
fn stringify_unknown(body: &Value) -> Option<String> {
    if body.is_null() {
        return None;
    }
    serde_json::to_string(body).ok()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
