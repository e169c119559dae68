//! Error types for the VIGIL validation pipeline.
//!
//! Most recoverable conditions in VIGIL never surface as errors: a
//! misconfigured cross-field rule is treated as satisfied, a failing condition
//! expression resolves to `false`, and a malformed constraint parameter only
//! fails its own check. The variants below cover what remains: loading
//! schemas, writing into objects, and the aggregate validation failure.

use thiserror::Error;

use crate::violation::Violation;

/// The unified error type for the VIGIL crates.
#[derive(Debug, Error)]
pub enum VigilError {
    /// A schema document or other configuration input is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The schema source collaborator could not produce schemas.
    #[error("schema source error: {reason}")]
    SchemaSource { reason: String },

    /// A field path could not be written on the target object.
    #[error("invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// An input value could not be coerced to the type its property declares.
    #[error("cannot transform field '{field}': {reason}")]
    Transform { field: String, reason: String },

    /// A condition expression could not be parsed or evaluated.
    ///
    /// Only returned from `try_evaluate`-style APIs; the rule engine itself
    /// maps this to `false`.
    #[error("expression error in '{expression}': {reason}")]
    ExpressionError { expression: String, reason: String },

    /// One or more fields failed validation.
    #[error("validation failed with {} violation(s)", violations.len())]
    ValidationFailed { violations: Vec<Violation> },
}

/// Convenience alias used throughout the VIGIL crates.
pub type VigilResult<T> = Result<T, VigilError>;
