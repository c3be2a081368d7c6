// waypoint-http/src/lib.rs
// ============================================================================
// Module: Waypoint HTTP
// Description: HTTP transport adapter for the Waypoint dispatch engine.
// Purpose: Bind call envelopes to the dispatcher over axum.
// Dependencies: waypoint-core, axum, tokio
// ============================================================================

//! ## Overview
//! The HTTP adapter binds the wire call envelope (`{"path", "args"}`) to the
//! core dispatcher. The route signals the call kind: `POST /query` for
//! queries, `POST /mutation` for mutations. Adapter-boundary failures
//! (oversized bodies, unparseable bodies, malformed envelopes) take the same
//! error pipeline as dispatch failures, so every failure reaches the caller
//! in the same envelope shape.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::DEFAULT_MAX_BODY_BYTES;
pub use config::ServerConfig;
pub use server::ContextFactory;
pub use server::HttpServer;
pub use server::HttpServerError;
