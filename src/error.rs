//! Error types for request handling
//!
//! The error taxonomy separates integrator misuse from malformed client input:
//!
//! - [`ConfigurationError`]: the integrator wired the framework incorrectly
//!   (missing data connector, connector without the required capability).
//! - [`FilterError`] / [`SortError`] / [`PagingError`]: malformed request
//!   input, always client-attributable.
//! - [`HandlerError::Validation`] / [`HandlerError::Process`]: caller-defined
//!   failures raised from hooks and processing steps.
//!
//! The lifecycle orchestrator maps any of these to a wire response: failures
//! during the validation phase become a 4xx envelope regardless of their kind,
//! while processing failures are dispatched by the status code attached to the
//! request context (see [`crate::handler`]).
//!
//! # Example
//!
//! ```rust
//! use portico_service::error::{ConfigurationError, HandlerError};
//!
//! let error: HandlerError = ConfigurationError::missing_connector().into();
//! assert!(error.to_string().contains("data connector"));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for handler operations
pub type HandlerResult<T> = std::result::Result<T, HandlerError>;

/// Integrator misconfiguration error
///
/// Raised when the framework is wired incorrectly: a missing data connector,
/// or a connector that does not implement the capability an operation variant
/// requires. Distinct from data errors: it always signals a bug in the
/// integration, never a runtime data condition.
///
/// # Example
///
/// ```rust
/// use portico_service::error::ConfigurationError;
///
/// let error = ConfigurationError::unsupported_operation("get");
/// assert_eq!(
///     error.to_string(),
///     "Data connector does not support get. Review the documentation",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    /// Create a new configuration error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The operation variant has no data connector configured
    #[must_use]
    pub fn missing_connector() -> Self {
        Self::new("Missing data connector. Review the documentation")
    }

    /// The configured data connector does not implement a required method
    #[must_use]
    pub fn unsupported_operation(method: &str) -> Self {
        Self::new(format!(
            "Data connector does not support {method}. Review the documentation"
        ))
    }
}

/// Malformed filter definition
///
/// Raised at definition-parse time, before any request filter is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FilterError {
    message: String,
}

impl FilterError {
    /// Create a new filter error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Invalid sort request
///
/// Raised when the requested sort field is not in the allow-list, or the sort
/// criteria is not `asc`/`desc`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SortError {
    message: String,
}

impl SortError {
    /// Create a new sort error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Invalid paging request
///
/// The offending value is embedded in the message for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PagingError {
    message: String,
}

impl PagingError {
    /// Create a new paging error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Top-level error for hook and processing failures
///
/// Every failure that can interrupt the request lifecycle converges here. The
/// orchestrator only ever needs the display message (for the client envelope)
/// and the status code attached to the request context, so the variants exist
/// to keep the source taxonomy intact for callers that match on them.
///
/// # Example
///
/// ```rust
/// use portico_service::error::HandlerError;
///
/// let error = HandlerError::validation("Missing ID in request path");
/// assert_eq!(error.to_string(), "Missing ID in request path");
/// assert!(matches!(error, HandlerError::Validation(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandlerError {
    /// Integrator misconfiguration
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Malformed filter definition
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Invalid sort request
    #[error("{0}")]
    Sort(#[from] SortError),

    /// Invalid paging request
    #[error("{0}")]
    Paging(#[from] PagingError),

    /// Request body is not valid JSON
    #[error("Invalid JSON body: {0}")]
    Body(String),

    /// Caller-defined validation failure
    #[error("{0}")]
    Validation(String),

    /// Caller-defined processing failure
    #[error("{0}")]
    Process(String),
}

impl HandlerError {
    /// Create a validation failure with the given message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a processing failure with the given message
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process(message.into())
    }
}

/// Body of a client error envelope
///
/// Client-attributable failures are serialized as `{"message": "..."}`.
///
/// # Example
///
/// ```rust
/// use portico_service::error::ErrorBody;
///
/// let body = ErrorBody::new("Invalid sort field age");
/// assert_eq!(
///     serde_json::to_string(&body).unwrap(),
///     r#"{"message":"Invalid sort field age"}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure message
    pub message: String,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
