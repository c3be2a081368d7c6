// waypoint-core/src/envelope.rs
// ============================================================================
// Module: Wire Envelope
// Description: Wire-level error envelope and transport-agnostic replies.
// Purpose: Give every outcome a stable serialized shape.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every failure leaves the dispatcher as the same envelope shape:
//! `{"error": {"code", "message", "path"?, "data"?}}`. The `code` is one of
//! the closed wire kinds, `path` appears only for input-class failures, and
//! `data` carries the formatter output when a formatting hook is installed.
//! [`Reply`] pairs a transport status with the serialized body for success
//! and failure alike.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::error::DispatchError;
use crate::error::ErrorKind;

// ============================================================================
// SECTION: Error Envelope
// ============================================================================

/// Externally visible shape of one classified failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorShape {
    /// Wire code from the closed taxonomy.
    pub code: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Field path, present only for input-class failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Formatter output, present only when a formatting hook is installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Wire-level error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The carried failure shape.
    pub error: ErrorShape,
}

impl ErrorEnvelope {
    /// Builds the envelope for a classified failure and optional formatter
    /// output.
    #[must_use]
    pub fn from_error(error: &DispatchError, data: Option<Value>) -> Self {
        Self {
            error: ErrorShape {
                code: error.kind(),
                message: error.message().to_string(),
                path: error.field_path().map(str::to_string),
                data,
            },
        }
    }
}

// ============================================================================
// SECTION: Reply
// ============================================================================

/// Transport-agnostic rendering of an outcome.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Transport status code.
    pub status: u16,
    /// Serialized response body.
    pub body: Value,
}

impl Reply {
    /// Renders a successful value.
    #[must_use]
    pub fn success(value: Value) -> Self {
        Self {
            status: 200,
            body: json!({ "result": value }),
        }
    }

    /// Renders a failure envelope with its classified status.
    #[must_use]
    pub fn failure(status: u16, envelope: &ErrorEnvelope) -> Self {
        let body = serde_json::to_value(envelope).unwrap_or_else(|_| {
            json!({
                "error": {
                    "code": ErrorKind::InternalServerError.as_str(),
                    "message": "serialization failed",
                }
            })
        });
        Self {
            status,
            body,
        }
    }
}
