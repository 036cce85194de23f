//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while validating a suite or building a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value cannot be sent.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// Header name as written in the suite.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A test case is malformed.
    #[error("invalid test case '{case}': {reason}")]
    InvalidTestCase {
        /// Name of the offending case (may be empty).
        case: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The suite as a whole is malformed.
    #[error("invalid suite: {0}")]
    InvalidSuite(String),
}

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidTestCase`].
    #[must_use]
    pub fn invalid_case(case: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTestCase {
            case: case.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
