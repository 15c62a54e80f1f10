//! Error Types
//!
//! Errors raised while handling the shared identifier types.

use serde::Serialize;
use thiserror::Error;

/// Error type for convene core types.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreError {
    /// A past-meeting identifier could not be parsed.
    ///
    /// Maps to HTTP 400 Bad Request.
    #[error("invalid past meeting id '{value}': {reason}")]
    InvalidPastMeetingId {
        /// The raw value that was rejected
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type alias using `CoreError`.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
