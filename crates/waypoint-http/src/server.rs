// waypoint-http/src/server.rs
// ============================================================================
// Module: HTTP Server
// Description: Axum HTTP adapter for the waypoint dispatch engine.
// Purpose: Expose router procedures over POST /query and POST /mutation.
// Dependencies: waypoint-core, axum, tokio
// ============================================================================

//! ## Overview
//! The HTTP adapter mounts a [`waypoint_core::Router`] behind two routes:
//! `POST /query` and `POST /mutation`. The route determines the procedure
//! kind expected by the call; the body carries the call envelope. All
//! transport-level failures are rendered through the same error pipeline as
//! resolver failures, so clients always receive the standard error envelope.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router as AxumRouter;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use waypoint_core::Call;
use waypoint_core::CallContext;
use waypoint_core::DispatchError;
use waypoint_core::ProcedureKind;
use waypoint_core::Reply;
use waypoint_core::Router;
use waypoint_core::dispatch;
use waypoint_core::fail;

use crate::config::ServerConfig;

// ============================================================================
// SECTION: Context Factory
// ============================================================================

/// Builds a per-request [`CallContext`] from transport metadata.
pub type ContextFactory = Arc<dyn Fn(&HeaderMap, SocketAddr) -> CallContext + Send + Sync>;

// ============================================================================
// SECTION: HTTP Server
// ============================================================================

/// HTTP server instance.
pub struct HttpServer {
    /// Server configuration.
    config: ServerConfig,
    /// Procedure router for request dispatch.
    router: Router,
    /// Optional per-request context factory.
    context_factory: Option<ContextFactory>,
}

impl HttpServer {
    /// Builds a new HTTP server from configuration and a router.
    #[must_use]
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router,
            context_factory: None,
        }
    }

    /// Installs a per-request context factory.
    #[must_use]
    pub fn with_context_factory(mut self, factory: ContextFactory) -> Self {
        self.context_factory = Some(factory);
        self
    }

    /// Serves requests on the configured bind address.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServerError`] when configuration is invalid or the
    /// transport fails.
    pub async fn serve(self) -> Result<(), HttpServerError> {
        self.config.validate()?;
        let addr = self.config.bind_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| HttpServerError::Transport(format!("bind failed: {err}")))?;
        self.serve_on(listener).await
    }

    /// Serves requests on an already-bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`HttpServerError`] when configuration is invalid or the
    /// transport fails.
    pub async fn serve_on(self, listener: tokio::net::TcpListener) -> Result<(), HttpServerError> {
        self.config.validate()?;
        let state = Arc::new(ServerState {
            router: self.router,
            max_body_bytes: self.config.max_body_bytes,
            context_factory: self.context_factory,
        });
        let app = AxumRouter::new()
            .route("/query", post(handle_query))
            .route("/mutation", post(handle_mutation))
            .with_state(state);
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|err| HttpServerError::Transport(format!("server failed: {err}")))
    }
}

/// Shared server state for route handlers.
struct ServerState {
    /// Procedure router for request dispatch.
    router: Router,
    /// Maximum allowed request body size.
    max_body_bytes: usize,
    /// Optional per-request context factory.
    context_factory: Option<ContextFactory>,
}

// ============================================================================
// SECTION: Route Handlers
// ============================================================================

/// Handles `POST /query` requests.
async fn handle_query(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> impl IntoResponse {
    let reply = handle(&state, peer, &headers, &bytes, ProcedureKind::Query).await;
    render(reply)
}

/// Handles `POST /mutation` requests.
async fn handle_mutation(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    bytes: Bytes,
) -> impl IntoResponse {
    let reply = handle(&state, peer, &headers, &bytes, ProcedureKind::Mutation).await;
    render(reply)
}

/// Converts a dispatch reply into an axum response.
fn render(reply: Reply) -> (StatusCode, axum::Json<Value>) {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, axum::Json(reply.body))
}

// ============================================================================
// SECTION: Request Handling
// ============================================================================

/// Wire shape of an incoming call.
#[derive(Debug, Deserialize)]
struct CallEnvelope {
    /// Dot-free procedure path segments.
    path: Vec<String>,
    /// Raw procedure arguments.
    #[serde(default)]
    args: Value,
}

/// Decodes and dispatches a single request.
async fn handle(
    state: &ServerState,
    peer: SocketAddr,
    headers: &HeaderMap,
    bytes: &Bytes,
    kind: ProcedureKind,
) -> Reply {
    let context = match &state.context_factory {
        Some(factory) => factory(headers, peer),
        None => CallContext::empty(),
    };
    if bytes.len() > state.max_body_bytes {
        let error = DispatchError::payload_too_large();
        return fail(&state.router, &[], Some(kind), &Value::Null, &context, error).into_reply();
    }
    let raw: Value = match serde_json::from_slice(bytes) {
        Ok(raw) => raw,
        Err(err) => {
            let error = DispatchError::parse_error()
                .with_message("request body is not valid JSON")
                .with_cause(err);
            return fail(&state.router, &[], Some(kind), &Value::Null, &context, error)
                .into_reply();
        }
    };
    let envelope: CallEnvelope = match serde_json::from_value(raw.clone()) {
        Ok(envelope) => envelope,
        Err(err) => {
            let error = DispatchError::bad_user_input()
                .with_message(format!("invalid call envelope: {err}"));
            return fail(&state.router, &[], Some(kind), &raw, &context, error).into_reply();
        }
    };
    let call = Call {
        path: envelope.path,
        kind,
        args: envelope.args,
        context,
    };
    dispatch(&state.router, call).await.into_reply()
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum HttpServerError {
    /// Configuration failures.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    /// Transport failures.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
