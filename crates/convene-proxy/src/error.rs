//! Proxy client error types
//!
//! Error definitions with transient/permanent classification for retry logic.

use convene_core::SubResourceKind;
use thiserror::Error;

/// Error that can occur while calling the proxied meeting system.
#[derive(Debug, Error)]
pub enum ProxyError {
    // Configuration errors (permanent)
    /// Client configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    // Resource errors (permanent)
    /// The addressed sub-resource does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: SubResourceKind, id: String },

    /// The sub-resource conflicts with existing state.
    #[error("{kind} conflict: {message}")]
    Conflict {
        kind: SubResourceKind,
        message: String,
    },

    /// Credentials were rejected.
    #[error("proxy rejected credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Any other non-success response.
    #[error("proxy returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    // Availability errors (transient)
    /// The proxy is overloaded or a gateway in front of it failed.
    #[error("proxy unavailable (HTTP {status}): {message}")]
    Unavailable { status: u16, message: String },

    /// The request could not be sent or timed out.
    #[error("request failed: {message}")]
    Request {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // Protocol errors
    /// The response body could not be decoded.
    #[error("failed to decode {kind} response: {message}")]
    Decode {
        kind: SubResourceKind,
        message: String,
    },
}

impl ProxyError {
    /// Check if this error is transient and the operation may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProxyError::Unavailable { .. } | ProxyError::Request { .. }
        )
    }

    /// Check if this error means the sub-resource is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProxyError::NotFound { .. })
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProxyError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ProxyError::NotFound { .. } => "NOT_FOUND",
            ProxyError::Conflict { .. } => "CONFLICT",
            ProxyError::Unauthorized { .. } => "UNAUTHORIZED",
            ProxyError::Api { .. } => "API_ERROR",
            ProxyError::Unavailable { .. } => "UNAVAILABLE",
            ProxyError::Request { .. } => "REQUEST_FAILED",
            ProxyError::Decode { .. } => "DECODE_FAILED",
        }
    }

    /// Create a request error with source.
    pub fn request_with_source(message: impl Into<String>, source: reqwest::Error) -> Self {
        ProxyError::Request {
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Result type for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;
