// waypoint-core/src/dispatch.rs
// ============================================================================
// Module: Dispatcher
// Description: Path resolution, validation, invocation, and error capture.
// Purpose: Turn a call into a normalized success or classified failure.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! [`dispatch`] walks the router tree for a call's path, checks the declared
//! kind against the resolved procedure, runs the validator, and invokes the
//! resolver. Every failure — routing, validation, resolver-thrown, or
//! adapter-raised via [`fail`] — passes through the router's observation hook
//! and then its formatting hook before the envelope is built, so callers see
//! one envelope shape regardless of cause.
//!
//! Classification precedence is fixed: an explicit protocol error wins over a
//! validator rejection, which wins over the generic internal wrap. A failure
//! that merely resembles another kind structurally is never reclassified.
//!
//! Dispatch is stateless and lock-free; a resolver that suspends stalls only
//! its own call. Timeout and cancellation policy belong to the transport
//! adapter, which may pass a signal through the opaque context.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::envelope::ErrorEnvelope;
use crate::envelope::Reply;
use crate::error::DispatchError;
use crate::error::ErrorKind;
use crate::error::ResolverError;
use crate::procedure::CallContext;
use crate::procedure::ProcedureKind;
use crate::router::ErrorEvent;
use crate::router::Router;

// ============================================================================
// SECTION: Calls and Outcomes
// ============================================================================

/// One procedure call as received from a transport adapter.
#[derive(Clone)]
pub struct Call {
    /// Ordered, non-empty path of names identifying the procedure.
    pub path: Vec<String>,
    /// Call kind as declared by the transport.
    pub kind: ProcedureKind,
    /// Procedure-specific argument payload.
    pub args: Value,
    /// Opaque per-call context, passed through to the resolver unmodified.
    pub context: CallContext,
}

/// Normalized result of one dispatch.
#[derive(Debug)]
pub enum Outcome {
    /// Resolver completed with a value.
    Success {
        /// The resolver's return value.
        value: Value,
    },
    /// Call failed; classified and already run through the error pipeline.
    Failure {
        /// The classified failure, including its server-side cause.
        error: DispatchError,
        /// The externally visible envelope.
        envelope: ErrorEnvelope,
    },
}

impl Outcome {
    /// Returns the transport status for the outcome.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Success {
                ..
            } => 200,
            Self::Failure {
                error, ..
            } => error.status(),
        }
    }

    /// Returns true for successful outcomes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the classified failure, when one exists.
    #[must_use]
    pub const fn error(&self) -> Option<&DispatchError> {
        match self {
            Self::Success {
                ..
            } => None,
            Self::Failure {
                error, ..
            } => Some(error),
        }
    }

    /// Renders the outcome into a transport-agnostic reply.
    #[must_use]
    pub fn into_reply(self) -> Reply {
        match self {
            Self::Success {
                value,
            } => Reply::success(value),
            Self::Failure {
                error,
                envelope,
            } => Reply::failure(error.status(), &envelope),
        }
    }
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Dispatches one call against a router tree.
pub async fn dispatch(router: &Router, call: Call) -> Outcome {
    let Call {
        path,
        kind,
        args,
        context,
    } = call;
    let procedure = match router.resolve(&path) {
        Ok(procedure) => procedure.clone(),
        Err(error) => return fail(router, &path, Some(kind), &args, &context, error),
    };
    if procedure.kind() != kind {
        let error = DispatchError::invalid_method().with_message(format!(
            "procedure is a {}, called as a {}",
            procedure.kind().as_str(),
            kind.as_str()
        ));
        return fail(router, &path, Some(kind), &args, &context, error);
    }
    let input = match procedure.validate(args.clone()) {
        Ok(input) => input,
        Err(violations) => {
            let mut error = DispatchError::new(ErrorKind::BadUserInput, violations.to_string());
            if let Some(name) = path.last() {
                error = error.with_field_path(name.clone());
            }
            let error = error.with_cause(violations);
            return fail(router, &path, Some(kind), &args, &context, error);
        }
    };
    match procedure.invoke(input, context.clone()).await {
        Ok(value) => Outcome::Success {
            value,
        },
        Err(resolver_error) => {
            let error = classify(resolver_error);
            fail(router, &path, Some(kind), &args, &context, error)
        }
    }
}

/// Runs a classified failure through the error pipeline.
///
/// Fires the observation hook (its own failures are discarded; the original
/// failure always wins), applies the formatting hook to fill the envelope
/// `data` field, and builds the envelope. Transport adapters use this for
/// failures raised before the dispatcher is reached, so every failure takes
/// the same pipeline.
pub fn fail(
    router: &Router,
    path: &[String],
    kind: Option<ProcedureKind>,
    input: &Value,
    context: &CallContext,
    error: DispatchError,
) -> Outcome {
    let event = ErrorEvent {
        error: &error,
        kind,
        path,
        input,
        context,
    };
    if let Some(hook) = router.observe_hook() {
        // Observer failures never replace the original failure.
        let _ = hook.on_error(&event);
    }
    let data = router.format_hook().map(|hook| hook.format(&event));
    let envelope = ErrorEnvelope::from_error(&error, data);
    Outcome::Failure {
        error,
        envelope,
    }
}

/// Classifies a resolver failure.
///
/// Explicit protocol errors propagate unchanged; anything else wraps as an
/// internal server error carrying the raw failure as its cause.
fn classify(error: ResolverError) -> DispatchError {
    match error {
        ResolverError::Protocol(error) => error,
        ResolverError::Unexpected(cause) => {
            let message = cause.to_string();
            let message = if message.is_empty() {
                "Internal server error".to_string()
            } else {
                message
            };
            DispatchError::internal(message).with_boxed_cause(cause)
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
