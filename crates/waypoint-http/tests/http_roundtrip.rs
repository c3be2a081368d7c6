// waypoint-http/tests/http_roundtrip.rs
// ============================================================================
// Module: HTTP Round-Trip Tests
// Description: End-to-end tests over a live HTTP server.
// Purpose: Verify the wire contract between server, client, and dispatcher.
// Dependencies: waypoint-core, waypoint-client, reqwest, tokio
// ============================================================================

//! ## Overview
//! Starts a real server on an ephemeral port and drives it with the typed
//! client plus raw HTTP requests for the malformed cases the client cannot
//! produce.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests assert invariants directly"
)]

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use serde_json::json;
use waypoint_client::RpcClient;
use waypoint_core::CallContext;
use waypoint_core::DispatchError;
use waypoint_core::ErrorKind;
use waypoint_core::Router;
use waypoint_core::TypeValidator;
use waypoint_http::ContextFactory;
use waypoint_http::HttpServer;
use waypoint_http::ServerConfig;

/// Builds the router used by every round-trip test.
fn test_router() -> Router {
    Router::new()
        .query("hello", |_args, _ctx| async move {
            Ok(json!({"greeting": "hello"}))
        })
        .expect("register hello")
        .query("whoami", |_args, ctx: CallContext| async move {
            let peer = ctx.get::<String>().cloned().unwrap_or_default();
            Ok(json!({"peer": peer}))
        })
        .expect("register whoami")
        .query("locked", |_args, _ctx| async move {
            Err(DispatchError::unauthenticated().into())
        })
        .expect("register locked")
        .mutation_with("rename", TypeValidator::string(), |args: Value, _ctx| async move {
            Ok(json!({"renamed": args}))
        })
        .expect("register rename")
}

/// Starts a server on an ephemeral port and returns its base URL.
async fn start_server(max_body_bytes: usize) -> String {
    let config = ServerConfig {
        bind: "127.0.0.1:0".to_string(),
        max_body_bytes,
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let factory: ContextFactory = Arc::new(|_headers: &axum::http::HeaderMap, peer: SocketAddr| {
        CallContext::new(peer.ip().to_string())
    });
    let server = HttpServer::new(config, test_router()).with_context_factory(factory);
    tokio::spawn(async move {
        let _ = server.serve_on(listener).await;
    });
    format!("http://{addr}")
}

/// Posts a raw body to a route and returns status plus decoded body.
async fn post_raw(base: &str, route: &str, body: Vec<u8>) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/{route}"))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .expect("request sent");
    let status = response.status().as_u16();
    let body: Value = response.json().await.expect("json body");
    (status, body)
}

#[tokio::test]
async fn query_round_trip_succeeds() {
    let base = start_server(1024 * 1024).await;
    let client = RpcClient::new(&base);
    let value = client.query(&["hello"], Value::Null).await.expect("query succeeds");
    assert_eq!(value, json!({"greeting": "hello"}));
}

#[tokio::test]
async fn mutation_round_trip_succeeds() {
    let base = start_server(1024 * 1024).await;
    let client = RpcClient::new(&base);
    let value = client.mutate(&["rename"], json!("ada")).await.expect("mutation succeeds");
    assert_eq!(value, json!({"renamed": "ada"}));
}

#[tokio::test]
async fn context_factory_feeds_resolver() {
    let base = start_server(1024 * 1024).await;
    let client = RpcClient::new(&base);
    let value = client.query(&["whoami"], Value::Null).await.expect("query succeeds");
    assert_eq!(value, json!({"peer": "127.0.0.1"}));
}

#[tokio::test]
async fn validator_rejection_reconstructs_client_error() {
    let base = start_server(1024 * 1024).await;
    let client = RpcClient::new(&base);
    let err = client.mutate(&["rename"], json!(42)).await.unwrap_err();
    assert_eq!(err.code(), ErrorKind::BadUserInput);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.path(), Some("rename"));
    assert!(err.message().contains("invalid_type"));
}

#[tokio::test]
async fn unknown_path_maps_to_not_found() {
    let base = start_server(1024 * 1024).await;
    let client = RpcClient::new(&base);
    let err = client.query(&["missing"], Value::Null).await.unwrap_err();
    assert_eq!(err.code(), ErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.path(), None);
}

#[tokio::test]
async fn protocol_error_propagates_status() {
    let base = start_server(1024 * 1024).await;
    let client = RpcClient::new(&base);
    let err = client.query(&["locked"], Value::Null).await.unwrap_err();
    assert_eq!(err.code(), ErrorKind::Unauthenticated);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Unauthorized");
}

#[tokio::test]
async fn kind_mismatch_maps_to_invalid_method() {
    let base = start_server(1024 * 1024).await;
    let client = RpcClient::new(&base);
    let err = client.mutate(&["hello"], Value::Null).await.unwrap_err();
    assert_eq!(err.code(), ErrorKind::InvalidMethod);
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn oversized_body_maps_to_payload_too_large() {
    let base = start_server(256).await;
    let padding = "x".repeat(512);
    let body = serde_json::to_vec(&json!({"path": ["hello"], "args": padding}))
        .expect("encode body");
    let (status, body) = post_raw(&base, "query", body).await;
    assert_eq!(status, 413);
    assert_eq!(body["error"]["code"], json!("PAYLOAD_TOO_LARGE"));
}

#[tokio::test]
async fn malformed_json_maps_to_parse_error() {
    let base = start_server(1024 * 1024).await;
    let (status, body) = post_raw(&base, "query", b"{not json".to_vec()).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], json!("PARSE_ERROR"));
    assert_eq!(body["error"]["message"], json!("request body is not valid JSON"));
}

#[tokio::test]
async fn invalid_envelope_maps_to_bad_user_input() {
    let base = start_server(1024 * 1024).await;
    let body = serde_json::to_vec(&json!({"path": "hello", "args": null})).expect("encode body");
    let (status, body) = post_raw(&base, "query", body).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], json!("BAD_USER_INPUT"));
}

#[tokio::test]
async fn success_body_wraps_result() {
    let base = start_server(1024 * 1024).await;
    let body = serde_json::to_vec(&json!({"path": ["hello"], "args": null})).expect("encode body");
    let (status, body) = post_raw(&base, "query", body).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"result": {"greeting": "hello"}}));
}
