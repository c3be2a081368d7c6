// waypoint-core/src/error.rs
// ============================================================================
// Module: Error Taxonomy
// Description: Closed error taxonomy and classified dispatch failures.
// Purpose: Normalize every failure into a stable, status-coded shape.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every failure that leaves the dispatcher is classified into the closed
//! [`ErrorKind`] taxonomy with a default transport status. [`DispatchError`]
//! carries the classified kind, status, message, and optional field path,
//! plus a server-side cause that is never serialized. [`ResolverError`] is the
//! failure type resolvers return: an explicit protocol error propagates its
//! own kind and status unchanged, while anything else is wrapped as an
//! internal server error at the dispatch boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::validate::Violations;

// ============================================================================
// SECTION: Error Kinds
// ============================================================================

/// Closed enumeration of wire-level error kinds.
///
/// # Invariants
/// - The set of kinds and their default statuses are fixed for wire
///   compatibility and must never change meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Request body could not be parsed.
    ParseError,
    /// Argument payload rejected by the procedure's validator.
    BadUserInput,
    /// Declared call kind does not match the resolved procedure.
    InvalidMethod,
    /// Missing or invalid authentication.
    Unauthenticated,
    /// Authenticated caller lacks access.
    Forbidden,
    /// Path does not resolve to a registered procedure.
    NotFound,
    /// Transport method not supported by the adapter.
    MethodNotSupported,
    /// Call exceeded a deadline imposed by the caller.
    Timeout,
    /// Call conflicts with current state.
    Conflict,
    /// A precondition declared by the caller failed.
    PreconditionFailed,
    /// Request payload exceeds size limits.
    PayloadTooLarge,
    /// Catch-all for unclassified failures.
    InternalServerError,
}

impl ErrorKind {
    /// Returns the canonical wire code for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::BadUserInput => "BAD_USER_INPUT",
            Self::InvalidMethod => "INVALID_METHOD",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            Self::Timeout => "TIMEOUT",
            Self::Conflict => "CONFLICT",
            Self::PreconditionFailed => "PRECONDITION_FAILED",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Parses a wire code into a kind.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PARSE_ERROR" => Some(Self::ParseError),
            "BAD_USER_INPUT" => Some(Self::BadUserInput),
            "INVALID_METHOD" => Some(Self::InvalidMethod),
            "UNAUTHENTICATED" => Some(Self::Unauthenticated),
            "FORBIDDEN" => Some(Self::Forbidden),
            "NOT_FOUND" => Some(Self::NotFound),
            "METHOD_NOT_SUPPORTED" => Some(Self::MethodNotSupported),
            "TIMEOUT" => Some(Self::Timeout),
            "CONFLICT" => Some(Self::Conflict),
            "PRECONDITION_FAILED" => Some(Self::PreconditionFailed),
            "PAYLOAD_TOO_LARGE" => Some(Self::PayloadTooLarge),
            "INTERNAL_SERVER_ERROR" => Some(Self::InternalServerError),
            _ => None,
        }
    }

    /// Returns the default transport status for the kind.
    #[must_use]
    pub const fn default_status(self) -> u16 {
        match self {
            Self::ParseError | Self::BadUserInput | Self::InvalidMethod => 400,
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::MethodNotSupported => 405,
            Self::Timeout => 408,
            Self::Conflict => 409,
            Self::PreconditionFailed => 412,
            Self::PayloadTooLarge => 413,
            Self::InternalServerError => 500,
        }
    }

    /// Returns true for kinds that originate from input handling.
    ///
    /// Input-class failures are the only ones that carry a field path on the
    /// wire.
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::BadUserInput | Self::ParseError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Classified Errors
// ============================================================================

/// A failure classified into the closed taxonomy.
///
/// # Invariants
/// - `status` defaults to the kind's table entry and may only be overridden
///   by an explicit protocol error.
/// - `cause` is server-side only and never serialized.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct DispatchError {
    /// Classified error kind.
    kind: ErrorKind,
    /// Transport status code.
    status: u16,
    /// Human-readable message.
    message: String,
    /// Field path for input-class failures.
    field_path: Option<String>,
    /// Original server-side failure, when one exists.
    cause: Option<Arc<dyn StdError + Send + Sync>>,
}

impl DispatchError {
    /// Creates a classified error with the kind's default status.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: kind.default_status(),
            message: message.into(),
            field_path: None,
            cause: None,
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse_error() -> Self {
        Self::new(ErrorKind::ParseError, "Parse error")
    }

    /// Creates a bad-user-input error.
    #[must_use]
    pub fn bad_user_input() -> Self {
        Self::new(ErrorKind::BadUserInput, "Bad user input")
    }

    /// Creates an invalid-method error.
    #[must_use]
    pub fn invalid_method() -> Self {
        Self::new(ErrorKind::InvalidMethod, "Invalid method")
    }

    /// Creates an unauthenticated error.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, "Unauthorized")
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Forbidden, "Forbidden")
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound, "Not Found")
    }

    /// Creates a method-not-supported error.
    #[must_use]
    pub fn method_not_supported() -> Self {
        Self::new(ErrorKind::MethodNotSupported, "Method Not Supported")
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, "Request Timeout")
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict, "Conflict")
    }

    /// Creates a precondition-failed error.
    #[must_use]
    pub fn precondition_failed() -> Self {
        Self::new(ErrorKind::PreconditionFailed, "Precondition Failed")
    }

    /// Creates a payload-too-large error.
    #[must_use]
    pub fn payload_too_large() -> Self {
        Self::new(ErrorKind::PayloadTooLarge, "Payload Too Large")
    }

    /// Creates an internal server error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// Replaces the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Overrides the transport status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Attaches the field path for input-class failures.
    #[must_use]
    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    /// Attaches the original server-side failure.
    #[must_use]
    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Attaches an already-boxed server-side failure.
    #[must_use]
    pub(crate) fn with_boxed_cause(mut self, cause: Box<dyn StdError + Send + Sync>) -> Self {
        self.cause = Some(Arc::from(cause));
        self
    }

    /// Returns the classified kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the transport status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path for input-class failures.
    #[must_use]
    pub fn field_path(&self) -> Option<&str> {
        self.field_path.as_deref()
    }

    /// Returns the original server-side failure, when one exists.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Returns the validator violations when the cause is a validation
    /// rejection.
    #[must_use]
    pub fn violations(&self) -> Option<&Violations> {
        self.cause().and_then(|cause| cause.downcast_ref::<Violations>())
    }
}

// ============================================================================
// SECTION: Resolver Errors
// ============================================================================

/// Failure returned by a procedure resolver.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Explicit protocol error; kind, status, and message propagate
    /// unchanged.
    #[error(transparent)]
    Protocol(#[from] DispatchError),
    /// Any other failure; wrapped as an internal server error at the
    /// dispatch boundary.
    #[error("{0}")]
    Unexpected(Box<dyn StdError + Send + Sync>),
}

impl ResolverError {
    /// Wraps an arbitrary failure.
    #[must_use]
    pub fn unexpected(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Unexpected(error.into())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
