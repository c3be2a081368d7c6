// waypoint-client/src/lib.rs
// ============================================================================
// Module: Waypoint Client
// Description: Caller-side contract for Waypoint RPC servers.
// Purpose: Reconstruct typed errors from wire envelopes and issue calls.
// Dependencies: waypoint-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! The client crate implements the consumer-facing half of the Waypoint
//! contract: [`ClientError`] reconstructs a typed error from a received wire
//! envelope of unknown or partial shape — it never fails, degrading to
//! defaults on malformed input — and [`RpcClient`] issues query and mutation
//! calls over HTTP against a Waypoint transport adapter.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::RpcClient;
pub use error::ClientError;
