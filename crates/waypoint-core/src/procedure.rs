// waypoint-core/src/procedure.rs
// ============================================================================
// Module: Procedures
// Description: Invokable procedure units and the opaque call context.
// Purpose: Bind a call kind, optional validator, and async resolver together.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Procedure`] is the leaf unit of the router tree: a kind (query or
//! mutation), an optional validator capability, and an async resolver from
//! the validated payload and an opaque [`CallContext`] to a JSON value.
//! Procedures are immutable once registered and resolvers never mutate router
//! structure. The context is caller-supplied and passed through unmodified;
//! the engine never inspects its contents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::ResolverError;
use crate::validate::Validator;
use crate::validate::Violations;

// ============================================================================
// SECTION: Call Context
// ============================================================================

/// Opaque per-call context handed through to resolvers.
///
/// # Invariants
/// - The engine never inspects the carried value; only resolvers may
///   downcast it.
#[derive(Clone, Default)]
pub struct CallContext {
    /// Caller-supplied value, absent for transports with nothing to carry.
    inner: Option<Arc<dyn Any + Send + Sync>>,
}

impl CallContext {
    /// Creates a context carrying the given value.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
        }
    }

    /// Creates a context carrying nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            inner: None,
        }
    }

    /// Returns the carried value when it has the requested type.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.as_ref().and_then(|value| value.downcast_ref::<T>())
    }
}

// ============================================================================
// SECTION: Procedure Kind
// ============================================================================

/// Kind of a procedure: read-only query or mutating command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureKind {
    /// Read-only procedure.
    Query,
    /// Mutating procedure.
    Mutation,
}

impl ProcedureKind {
    /// Returns the canonical string name for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }

    /// Parses a canonical kind name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "query" => Some(Self::Query),
            "mutation" => Some(Self::Mutation),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Procedure
// ============================================================================

/// Boxed future returned by a resolver.
pub type ResolverFuture = Pin<Box<dyn Future<Output = Result<Value, ResolverError>> + Send>>;

/// Resolver function from validated input and context to a value.
type ResolverFn = dyn Fn(Value, CallContext) -> ResolverFuture + Send + Sync;

/// A named, invokable unit of behavior.
///
/// # Invariants
/// - Immutable once registered; shared by all concurrent dispatches.
#[derive(Clone)]
pub struct Procedure {
    /// Query or mutation.
    kind: ProcedureKind,
    /// Optional validator capability; absent means pass-through.
    validator: Option<Arc<dyn Validator>>,
    /// Async resolver invoked with the validated payload.
    resolver: Arc<ResolverFn>,
}

impl std::fmt::Debug for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Procedure")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Procedure {
    /// Creates a procedure of the given kind from an async resolver.
    #[must_use]
    pub fn new<F, Fut>(kind: ProcedureKind, resolver: F) -> Self
    where
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
    {
        Self {
            kind,
            validator: None,
            resolver: Arc::new(move |input, context| Box::pin(resolver(input, context))),
        }
    }

    /// Creates a query procedure.
    #[must_use]
    pub fn query<F, Fut>(resolver: F) -> Self
    where
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
    {
        Self::new(ProcedureKind::Query, resolver)
    }

    /// Creates a mutation procedure.
    #[must_use]
    pub fn mutation<F, Fut>(resolver: F) -> Self
    where
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
    {
        Self::new(ProcedureKind::Mutation, resolver)
    }

    /// Attaches a validator capability.
    #[must_use]
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Returns the procedure kind.
    #[must_use]
    pub const fn kind(&self) -> ProcedureKind {
        self.kind
    }

    /// Runs the validator on a raw payload; pass-through when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Violations`] when the validator rejects the payload.
    pub fn validate(&self, raw: Value) -> Result<Value, Violations> {
        match &self.validator {
            Some(validator) => validator.validate(raw),
            None => Ok(raw),
        }
    }

    /// Invokes the resolver with a validated payload.
    pub fn invoke(&self, input: Value, context: CallContext) -> ResolverFuture {
        (self.resolver)(input, context)
    }
}
