// waypoint-client/src/error/tests.rs
// ============================================================================
// Module: Client Error Unit Tests
// Description: Unit tests for error envelope reconstruction.
// Purpose: Pin the degradation chain for malformed envelopes.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Feeds well-formed, partial, and garbage envelopes through reconstruction
//! and checks every fallback documented by the contract.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use serde_json::json;

use super::*;

#[test]
fn reconstructs_a_full_envelope() {
    let body = json!({
        "error": {
            "code": "BAD_USER_INPUT",
            "message": "rejected",
            "path": "rename",
            "data": { "type": "validator" },
        }
    });
    let error = ClientError::from_response(Some(400), &body, "fallback");
    assert_eq!(error.status(), Some(400));
    assert_eq!(error.code(), ErrorKind::BadUserInput);
    assert_eq!(error.message(), "rejected");
    assert_eq!(error.path(), Some("rename"));
    assert_eq!(error.data(), Some(&json!({ "type": "validator" })));
}

#[test]
fn unrecognized_code_degrades_to_internal_server_error() {
    let body = json!({ "error": { "code": "SOMETHING_NEW", "message": "hm" } });
    let error = ClientError::from_response(Some(500), &body, "fallback");
    assert_eq!(error.code(), ErrorKind::InternalServerError);
    assert_eq!(error.message(), "hm");
}

#[test]
fn missing_message_falls_back_to_stringified_body() {
    let body = json!({ "error": { "code": "CONFLICT" } });
    let error = ClientError::from_response(Some(409), &body, "fallback");
    assert_eq!(error.code(), ErrorKind::Conflict);
    assert_eq!(error.message(), r#"{"error":{"code":"CONFLICT"}}"#);
}

#[test]
fn null_body_falls_back_to_the_default_message() {
    let error = ClientError::from_response(None, &Value::Null, "fallback");
    assert_eq!(error.code(), ErrorKind::InternalServerError);
    assert_eq!(error.message(), "fallback");
    assert_eq!(error.status(), None);
}

#[test]
fn path_is_dropped_for_non_input_failures() {
    let body = json!({
        "error": { "code": "FORBIDDEN", "message": "no", "path": "secret" }
    });
    let error = ClientError::from_response(Some(403), &body, "fallback");
    assert_eq!(error.code(), ErrorKind::Forbidden);
    assert_eq!(error.path(), None);
}

#[test]
fn path_is_kept_for_parse_errors() {
    let body = json!({
        "error": { "code": "PARSE_ERROR", "message": "bad body", "path": "root" }
    });
    let error = ClientError::from_response(Some(400), &body, "fallback");
    assert_eq!(error.path(), Some("root"));
}

#[test]
fn garbage_shapes_never_panic() {
    for body in [
        json!("just a string"),
        json!(42),
        json!({ "error": "not an object" }),
        json!({ "error": { "code": 7, "message": ["nope"] } }),
        json!([1, 2, 3]),
    ] {
        let error = ClientError::from_response(Some(500), &body, "fallback");
        assert_eq!(error.code(), ErrorKind::InternalServerError);
        assert!(!error.message().is_empty());
    }
}

#[test]
fn transport_failures_have_no_status() {
    let error = ClientError::transport("connection refused");
    assert_eq!(error.status(), None);
    assert_eq!(error.code(), ErrorKind::InternalServerError);
    assert_eq!(error.message(), "connection refused");
}
