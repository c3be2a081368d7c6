// waypoint-core/src/error/tests.rs
// ============================================================================
// Module: Error Taxonomy Unit Tests
// Description: Unit tests for the closed error taxonomy.
// Purpose: Pin the wire codes and default status table.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Pins the wire codes, status mapping, and classification helpers. The code
//! and status tables are wire contracts and must never drift.

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

use crate::Violation;

use super::*;

/// All kinds paired with their fixed wire code and default status.
const TABLE: [(ErrorKind, &str, u16); 12] = [
    (ErrorKind::ParseError, "PARSE_ERROR", 400),
    (ErrorKind::BadUserInput, "BAD_USER_INPUT", 400),
    (ErrorKind::InvalidMethod, "INVALID_METHOD", 400),
    (ErrorKind::Unauthenticated, "UNAUTHENTICATED", 401),
    (ErrorKind::Forbidden, "FORBIDDEN", 403),
    (ErrorKind::NotFound, "NOT_FOUND", 404),
    (ErrorKind::MethodNotSupported, "METHOD_NOT_SUPPORTED", 405),
    (ErrorKind::Timeout, "TIMEOUT", 408),
    (ErrorKind::Conflict, "CONFLICT", 409),
    (ErrorKind::PreconditionFailed, "PRECONDITION_FAILED", 412),
    (ErrorKind::PayloadTooLarge, "PAYLOAD_TOO_LARGE", 413),
    (ErrorKind::InternalServerError, "INTERNAL_SERVER_ERROR", 500),
];

#[test]
fn wire_codes_and_statuses_are_stable() {
    for (kind, code, status) in TABLE {
        assert_eq!(kind.as_str(), code);
        assert_eq!(kind.default_status(), status);
        assert_eq!(ErrorKind::parse(code), Some(kind));
    }
}

#[test]
fn serde_codes_match_as_str() {
    for (kind, code, _) in TABLE {
        assert_eq!(serde_json::to_value(kind).unwrap(), json!(code));
        let parsed: ErrorKind = serde_json::from_value(json!(code)).unwrap();
        assert_eq!(parsed, kind);
    }
}

#[test]
fn parse_rejects_unknown_codes() {
    assert_eq!(ErrorKind::parse("NOT_A_CODE"), None);
    assert_eq!(ErrorKind::parse("not_found"), None);
}

#[test]
fn input_classification_covers_parse_and_user_input() {
    for (kind, _, _) in TABLE {
        let expected = matches!(kind, ErrorKind::BadUserInput | ErrorKind::ParseError);
        assert_eq!(kind.is_input(), expected);
    }
}

#[test]
fn new_uses_default_status() {
    let error = DispatchError::new(ErrorKind::Conflict, "already exists");
    assert_eq!(error.kind(), ErrorKind::Conflict);
    assert_eq!(error.status(), 409);
    assert_eq!(error.message(), "already exists");
    assert!(error.field_path().is_none());
    assert!(error.cause().is_none());
}

#[test]
fn with_status_overrides_table_entry() {
    let error = DispatchError::unauthenticated().with_status(418);
    assert_eq!(error.kind(), ErrorKind::Unauthenticated);
    assert_eq!(error.status(), 418);
}

#[test]
fn unauthenticated_defaults_to_unauthorized_message() {
    let error = DispatchError::unauthenticated();
    assert_eq!(error.message(), "Unauthorized");
    assert_eq!(error.status(), 401);
}

#[test]
fn cause_supports_downcast() {
    let violations = Violations::single(Violation::invalid_type("string", "number", Vec::new()));
    let error = DispatchError::bad_user_input().with_cause(violations);
    assert!(error.violations().is_some());
    assert!(error.cause().is_some());
}

#[test]
fn protocol_resolver_error_keeps_classification() {
    let error = ResolverError::from(DispatchError::forbidden());
    match error {
        ResolverError::Protocol(inner) => assert_eq!(inner.kind(), ErrorKind::Forbidden),
        ResolverError::Unexpected(_) => panic!("expected protocol classification"),
    }
}
