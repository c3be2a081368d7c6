// waypoint-core/src/lib.rs
// ============================================================================
// Module: Waypoint Core
// Description: In-process RPC dispatch engine for Waypoint.
// Purpose: Provide the router tree, dispatcher, and error pipeline.
// Dependencies: serde, serde_json, thiserror, jsonschema
// ============================================================================

//! ## Overview
//! Waypoint Core is an in-process RPC dispatch engine. A [`Router`] is an
//! immutable tree of named procedures (queries and mutations) and nested
//! sub-routers. [`dispatch`] resolves an ordered path of names to a procedure,
//! validates the argument payload, invokes the resolver, and normalizes both
//! success and failure into a transport-agnostic envelope. Failures are
//! classified into the closed [`ErrorKind`] taxonomy and shaped by the
//! router's optional formatting and observation hooks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod procedure;
pub mod router;
pub mod validate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatch::Call;
pub use dispatch::Outcome;
pub use dispatch::dispatch;
pub use dispatch::fail;
pub use envelope::ErrorEnvelope;
pub use envelope::ErrorShape;
pub use envelope::Reply;
pub use error::DispatchError;
pub use error::ErrorKind;
pub use error::ResolverError;
pub use procedure::CallContext;
pub use procedure::Procedure;
pub use procedure::ProcedureKind;
pub use router::ErrorEvent;
pub use router::FormatError;
pub use router::OnError;
pub use router::Router;
pub use router::RouterError;
pub use validate::JsonType;
pub use validate::SchemaError;
pub use validate::SchemaValidator;
pub use validate::TypeValidator;
pub use validate::Validator;
pub use validate::Violation;
pub use validate::Violations;
