//! Domain error types.
//!
//! Every validation or aggregate rule violation in the core is reported
//! through [`DomainError`]. Grading never returns one of these; a bad
//! submission is still graded (as incorrect).

use thiserror::Error;

/// Errors raised when a value object or aggregate rule is violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Wrong shape, out-of-range counts, missing required sub-fields.
    #[error("{0}")]
    Validation(String),

    /// Numeric value outside its allowed range or not finite.
    #[error("{0}")]
    OutOfRange(String),

    /// Unknown discriminator value.
    #[error("unsupported problem type: {0}")]
    UnsupportedType(String),

    /// A tag with the same normalized name is already attached.
    #[error("tag already exists: {0}")]
    DuplicateTag(String),

    /// No tag with the given normalized name is attached.
    #[error("tag not found: {0}")]
    TagNotFound(String),

    /// Too many distinct tags for a single problem.
    #[error("too many tags: {count} exceeds the maximum of {max}")]
    TagLimitExceeded { count: usize, max: usize },

    /// Problem content and answer key describe different variants.
    #[error("answer type {answer} does not match content type {content}")]
    TypeMismatch { content: String, answer: String },

    /// JSON payload could not be mapped onto the expected shape.
    #[error("invalid payload: {0}")]
    Serialization(String),
}

impl DomainError {
    /// Shorthand for a [`DomainError::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    /// Shorthand for a [`DomainError::OutOfRange`] with the given message.
    pub fn out_of_range(message: impl Into<String>) -> Self {
        DomainError::OutOfRange(message.into())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

/// Result alias used throughout the core.
pub type DomainResult<T> = Result<T, DomainError>;
