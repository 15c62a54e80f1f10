//! Error types for the convene-idmap crate.

use thiserror::Error;

/// Errors that can occur while resolving identifiers.
///
/// A missing mapping is not an error: resolvers return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum IdMapError {
    // Configuration errors (permanent, no retry)
    /// Required configuration variable is missing.
    #[error("Configuration missing: {var}")]
    ConfigMissing { var: String },

    /// Configuration value is invalid.
    #[error("Configuration invalid for {var}: {reason}")]
    ConfigInvalid { var: String, reason: String },

    // Connection errors (transient, retry with backoff)
    /// Failed to connect to the messaging server.
    #[error("Connection to {url} failed: {cause}")]
    ConnectionFailed { url: String, cause: String },

    /// The lookup did not answer within the configured timeout.
    #[error("Lookup on {subject} timed out after {timeout_ms}ms")]
    Timeout { subject: String, timeout_ms: u64 },

    /// Nobody is listening on the lookup subject.
    #[error("Lookup service unavailable on {subject}: {cause}")]
    Unavailable { subject: String, cause: String },

    /// Any other transport failure.
    #[error("Lookup request on {subject} failed: {cause}")]
    Transport { subject: String, cause: String },

    // Protocol errors
    /// The lookup service answered with something we cannot interpret.
    #[error("Invalid lookup response on {subject}: {reason}")]
    InvalidResponse { subject: String, reason: String },
}

impl IdMapError {
    /// Returns true if this error is transient and can be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            IdMapError::ConnectionFailed { .. }
                | IdMapError::Timeout { .. }
                | IdMapError::Unavailable { .. }
                | IdMapError::Transport { .. }
        )
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            IdMapError::ConfigMissing { .. } | IdMapError::ConfigInvalid { .. }
        )
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            IdMapError::ConfigMissing { .. } => "CONFIG_MISSING",
            IdMapError::ConfigInvalid { .. } => "CONFIG_INVALID",
            IdMapError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            IdMapError::Timeout { .. } => "LOOKUP_TIMEOUT",
            IdMapError::Unavailable { .. } => "LOOKUP_UNAVAILABLE",
            IdMapError::Transport { .. } => "TRANSPORT_ERROR",
            IdMapError::InvalidResponse { .. } => "INVALID_RESPONSE",
        }
    }
}

/// Result type for identifier resolution.
pub type IdMapResult<T> = Result<T, IdMapError>;
