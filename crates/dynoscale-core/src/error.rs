//! Error types for Dynoscale.

use std::fmt;

/// Core error type for a capacity adjustment run.
///
/// Every collaborator failure surfaces as one of these and aborts the
/// invocation; nothing is retried at this layer.
#[derive(Debug, thiserror::Error)]
pub enum DynoscaleError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An external service call failed.
    #[error("{service} {operation} failed: {message}")]
    Service {
        /// Service that rejected the call (e.g. `"dynamodb"`).
        service: &'static str,
        /// Operation name as the service knows it (e.g. `"UpdateTable"`).
        operation: &'static str,
        /// Rendered error detail.
        message: String,
    },

    /// An external service answered without a field we depend on.
    #[error("malformed {operation} response: {message}")]
    MalformedResponse {
        /// Operation whose response was incomplete.
        operation: &'static str,
        /// What was missing.
        message: String,
    },
}

impl DynoscaleError {
    /// Build a [`DynoscaleError::Service`] from any displayable error.
    pub fn service(service: &'static str, operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Service {
            service,
            operation,
            message: err.to_string(),
        }
    }

    /// Build a [`DynoscaleError::MalformedResponse`].
    pub fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            message: message.into(),
        }
    }
}

/// Convenience result type for Dynoscale operations.
pub type DynoscaleResult<T> = Result<T, DynoscaleError>;
