// waypoint-core/src/router.rs
// ============================================================================
// Module: Router Tree
// Description: Composable namespace of procedures and nested routers.
// Purpose: Build the immutable dispatch tree and its error pipeline hooks.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`Router`] is an ordered, name-keyed collection of procedures and nested
//! sub-routers. Registration is fail-fast: colliding names at one level are a
//! build-time error, never a silent overwrite. Storage is a plain `BTreeMap`,
//! so a name resolves if and only if it was explicitly registered — there are
//! no inherited or built-in members to collide with, and procedures named
//! after universal object properties dispatch like any other.
//!
//! The router also carries the error pipeline configuration: an optional
//! formatting hook shaping the envelope `data` field and an optional
//! observation hook fired for every failure. Both are set once at build time
//! and apply to every dispatch through the router, including everything
//! merged beneath it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::error::DispatchError;
use crate::error::ResolverError;
use crate::procedure::CallContext;
use crate::procedure::Procedure;
use crate::procedure::ProcedureKind;
use crate::validate::Validator;

// ============================================================================
// SECTION: Error Pipeline Hooks
// ============================================================================

/// Context handed to the error pipeline hooks for one failure.
pub struct ErrorEvent<'a> {
    /// The classified failure.
    pub error: &'a DispatchError,
    /// Declared call kind, when known.
    pub kind: Option<ProcedureKind>,
    /// Call path as received.
    pub path: &'a [String],
    /// Raw argument payload as received.
    pub input: &'a Value,
    /// Opaque per-call context.
    pub context: &'a CallContext,
}

/// Observation hook fired once for every failure.
///
/// Used purely for side effects (auditing, metrics). A failing observer is
/// swallowed; the original failure always reaches the caller.
pub trait OnError: Send + Sync {
    /// Observes a classified failure.
    ///
    /// # Errors
    ///
    /// Observer failures are discarded by the dispatcher.
    fn on_error(&self, event: &ErrorEvent<'_>) -> Result<(), Box<dyn StdError + Send + Sync>>;
}

impl<F> OnError for F
where
    F: Fn(&ErrorEvent<'_>) -> Result<(), Box<dyn StdError + Send + Sync>> + Send + Sync,
{
    fn on_error(&self, event: &ErrorEvent<'_>) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self(event)
    }
}

/// Formatting hook shaping the externally visible error payload.
///
/// The returned value lands in the envelope `data` field only; the classified
/// code and status never change. Implementations must be pure.
pub trait FormatError: Send + Sync {
    /// Formats a classified failure into an arbitrary serializable shape.
    fn format(&self, event: &ErrorEvent<'_>) -> Value;
}

impl<F> FormatError for F
where
    F: Fn(&ErrorEvent<'_>) -> Value + Send + Sync,
{
    fn format(&self, event: &ErrorEvent<'_>) -> Value {
        self(event)
    }
}

// ============================================================================
// SECTION: Router Errors
// ============================================================================

/// Router build-time errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Name already registered at this level.
    #[error("duplicate name: {name}")]
    DuplicateName {
        /// The colliding name.
        name: String,
    },
    /// An error formatter is already installed.
    #[error("error formatter already installed")]
    DuplicateErrorFormatter,
    /// An error observer is already installed.
    #[error("error observer already installed")]
    DuplicateErrorObserver,
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Composable namespace of procedures and nested routers.
///
/// # Invariants
/// - Built once at startup, immutable thereafter, and safe for
///   unsynchronized concurrent reads.
/// - A name is present if and only if it was explicitly registered.
#[derive(Clone, Default)]
pub struct Router {
    /// Procedures registered at this level.
    procedures: BTreeMap<String, Arc<Procedure>>,
    /// Nested sub-routers registered at this level.
    children: BTreeMap<String, Router>,
    /// Optional formatting hook for the envelope `data` field.
    format_error: Option<Arc<dyn FormatError>>,
    /// Optional observation hook fired for every failure.
    on_error: Option<Arc<dyn OnError>>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a procedure under a name.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] when the name already exists at
    /// this level as a procedure or a child.
    pub fn procedure(
        mut self,
        name: impl Into<String>,
        procedure: Procedure,
    ) -> Result<Self, RouterError> {
        let name = name.into();
        self.ensure_vacant(&name)?;
        self.procedures.insert(name, Arc::new(procedure));
        Ok(self)
    }

    /// Registers a query procedure from an async resolver.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] on a name collision.
    pub fn query<F, Fut>(self, name: impl Into<String>, resolver: F) -> Result<Self, RouterError>
    where
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
    {
        self.procedure(name, Procedure::query(resolver))
    }

    /// Registers a query procedure with a validator capability.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] on a name collision.
    pub fn query_with<V, F, Fut>(
        self,
        name: impl Into<String>,
        validator: V,
        resolver: F,
    ) -> Result<Self, RouterError>
    where
        V: Validator + 'static,
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
    {
        self.procedure(name, Procedure::query(resolver).with_validator(validator))
    }

    /// Registers a mutation procedure from an async resolver.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] on a name collision.
    pub fn mutation<F, Fut>(self, name: impl Into<String>, resolver: F) -> Result<Self, RouterError>
    where
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
    {
        self.procedure(name, Procedure::mutation(resolver))
    }

    /// Registers a mutation procedure with a validator capability.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] on a name collision.
    pub fn mutation_with<V, F, Fut>(
        self,
        name: impl Into<String>,
        validator: V,
        resolver: F,
    ) -> Result<Self, RouterError>
    where
        V: Validator + 'static,
        F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
    {
        self.procedure(name, Procedure::mutation(resolver).with_validator(validator))
    }

    /// Registers a nested sub-router under a name.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] when the name already exists at
    /// this level as a procedure or a child.
    pub fn child(mut self, name: impl Into<String>, router: Self) -> Result<Self, RouterError> {
        let name = name.into();
        self.ensure_vacant(&name)?;
        self.children.insert(name, router);
        Ok(self)
    }

    /// Merges another router into this one as a structural union.
    ///
    /// Hooks installed on the other router move over when this router has
    /// none of its own.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateName`] on any overlapping procedure or
    /// child name, and a hook conflict error when both routers carry the same
    /// hook.
    pub fn merge(mut self, other: Self) -> Result<Self, RouterError> {
        for (name, procedure) in other.procedures {
            self.ensure_vacant(&name)?;
            self.procedures.insert(name, procedure);
        }
        for (name, child) in other.children {
            self.ensure_vacant(&name)?;
            self.children.insert(name, child);
        }
        if let Some(hook) = other.format_error {
            if self.format_error.is_some() {
                return Err(RouterError::DuplicateErrorFormatter);
            }
            self.format_error = Some(hook);
        }
        if let Some(hook) = other.on_error {
            if self.on_error.is_some() {
                return Err(RouterError::DuplicateErrorObserver);
            }
            self.on_error = Some(hook);
        }
        Ok(self)
    }

    /// Installs the formatting hook for the envelope `data` field.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateErrorFormatter`] when one is already
    /// installed.
    pub fn format_error(mut self, hook: impl FormatError + 'static) -> Result<Self, RouterError> {
        if self.format_error.is_some() {
            return Err(RouterError::DuplicateErrorFormatter);
        }
        self.format_error = Some(Arc::new(hook));
        Ok(self)
    }

    /// Installs the observation hook fired for every failure.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateErrorObserver`] when one is already
    /// installed.
    pub fn on_error(mut self, hook: impl OnError + 'static) -> Result<Self, RouterError> {
        if self.on_error.is_some() {
            return Err(RouterError::DuplicateErrorObserver);
        }
        self.on_error = Some(Arc::new(hook));
        Ok(self)
    }

    /// Resolves an ordered path of names to a procedure.
    ///
    /// All but the last segment walk child routers; the last segment is the
    /// procedure name.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`DispatchError`] for empty paths, missing
    /// children, or missing procedures.
    pub fn resolve(&self, path: &[String]) -> Result<&Arc<Procedure>, DispatchError> {
        let Some((name, parents)) = path.split_last() else {
            return Err(DispatchError::not_found());
        };
        let mut router = self;
        for segment in parents {
            router = router.children.get(segment).ok_or_else(DispatchError::not_found)?;
        }
        router.procedures.get(name).ok_or_else(DispatchError::not_found)
    }

    /// Returns the installed formatting hook.
    #[must_use]
    pub(crate) fn format_hook(&self) -> Option<&Arc<dyn FormatError>> {
        self.format_error.as_ref()
    }

    /// Returns the installed observation hook.
    #[must_use]
    pub(crate) fn observe_hook(&self) -> Option<&Arc<dyn OnError>> {
        self.on_error.as_ref()
    }

    /// Fails when a name is already taken at this level.
    fn ensure_vacant(&self, name: &str) -> Result<(), RouterError> {
        if self.procedures.contains_key(name) || self.children.contains_key(name) {
            return Err(RouterError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
