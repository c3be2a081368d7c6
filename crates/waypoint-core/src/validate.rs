// waypoint-core/src/validate.rs
// ============================================================================
// Module: Validator Capability
// Description: Input validation contract and built-in validators.
// Purpose: Turn raw argument payloads into typed values or field violations.
// Dependencies: jsonschema, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Validator`] takes a raw argument payload and returns either the
//! validated value or a structured list of field-level [`Violations`]. A
//! procedure without a validator passes its input through unchanged. Two
//! implementations ship with the engine: [`TypeValidator`] checks the bare
//! JSON type of the payload, and [`SchemaValidator`] evaluates a full JSON
//! Schema. The `Display` output of a violation list is the pretty-printed
//! JSON array; the dispatcher uses it verbatim as the bad-user-input message.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use jsonschema::Draft;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Violations
// ============================================================================

/// A single field-level validation rejection.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Stable violation code, e.g. `invalid_type`.
    pub code: String,
    /// Expected JSON type, when the violation is a type mismatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Received JSON type, when the violation is a type mismatch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
    /// Path of the offending sub-field, empty for the payload root.
    pub path: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a type-mismatch violation.
    #[must_use]
    pub fn invalid_type(
        expected: impl Into<String>,
        received: impl Into<String>,
        path: Vec<String>,
    ) -> Self {
        let expected = expected.into();
        let received = received.into();
        let message = format!("Expected {expected}, received {received}");
        Self {
            code: "invalid_type".to_string(),
            expected: Some(expected),
            received: Some(received),
            path,
            message,
        }
    }

    /// Creates a schema violation with a free-form message.
    #[must_use]
    pub fn schema(message: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            code: "schema".to_string(),
            expected: None,
            received: None,
            path,
            message: message.into(),
        }
    }
}

/// Ordered list of validation rejections for one payload.
///
/// # Invariants
/// - Never empty; a validator that accepts its input returns `Ok` instead.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Creates a violation list.
    #[must_use]
    pub const fn new(entries: Vec<Violation>) -> Self {
        Self(entries)
    }

    /// Creates a single-entry violation list.
    #[must_use]
    pub fn single(entry: Violation) -> Self {
        Self(vec![entry])
    }

    /// Returns the individual violations.
    #[must_use]
    pub fn entries(&self) -> &[Violation] {
        &self.0
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl std::error::Error for Violations {}

// ============================================================================
// SECTION: Validator Contract
// ============================================================================

/// Input validation capability supplied per procedure.
///
/// Implementations must be side-effect free and safe to call from many
/// concurrent dispatches.
pub trait Validator: Send + Sync {
    /// Validates a raw payload, returning the value handed to the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`Violations`] describing every rejected field.
    fn validate(&self, raw: Value) -> Result<Value, Violations>;
}

// ============================================================================
// SECTION: Type Validator
// ============================================================================

/// JSON value types recognized by [`TypeValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    /// JSON string.
    String,
    /// JSON number.
    Number,
    /// JSON boolean.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// JSON null.
    Null,
}

impl JsonType {
    /// Returns the lowercase type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }

    /// Returns the type of a JSON value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::Null => Self::Null,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator that checks the bare JSON type of the payload.
#[derive(Debug, Clone, Copy)]
pub struct TypeValidator {
    /// Required payload type.
    expected: JsonType,
}

impl TypeValidator {
    /// Creates a validator requiring the given JSON type.
    #[must_use]
    pub const fn new(expected: JsonType) -> Self {
        Self {
            expected,
        }
    }

    /// Creates a validator requiring a string payload.
    #[must_use]
    pub const fn string() -> Self {
        Self::new(JsonType::String)
    }

    /// Creates a validator requiring a number payload.
    #[must_use]
    pub const fn number() -> Self {
        Self::new(JsonType::Number)
    }

    /// Creates a validator requiring an object payload.
    #[must_use]
    pub const fn object() -> Self {
        Self::new(JsonType::Object)
    }
}

impl Validator for TypeValidator {
    fn validate(&self, raw: Value) -> Result<Value, Violations> {
        let received = JsonType::of(&raw);
        if received == self.expected {
            return Ok(raw);
        }
        Err(Violations::single(Violation::invalid_type(
            self.expected.as_str(),
            received.as_str(),
            Vec::new(),
        )))
    }
}

// ============================================================================
// SECTION: Schema Validator
// ============================================================================

/// Schema compilation error.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema document is not a valid JSON Schema.
    #[error("invalid schema: {0}")]
    Invalid(String),
}

/// Validator backed by a compiled JSON Schema.
pub struct SchemaValidator {
    /// Compiled schema.
    schema: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compiles a JSON Schema into a validator.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the schema document is invalid.
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        let schema = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|err| SchemaError::Invalid(err.to_string()))?;
        Ok(Self {
            schema,
        })
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, raw: Value) -> Result<Value, Violations> {
        let entries: Vec<Violation> = self
            .schema
            .iter_errors(&raw)
            .map(|err| Violation::schema(err.to_string(), pointer_segments(&err.instance_path())))
            .collect();
        if entries.is_empty() {
            return Ok(raw);
        }
        Err(Violations::new(entries))
    }
}

/// Splits a JSON pointer into its path segments.
fn pointer_segments(pointer: &impl ToString) -> Vec<String> {
    pointer
        .to_string()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
