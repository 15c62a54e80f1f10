//! # Proxy Clients
//!
//! HTTP clients for the two sub-resources that back a past-meeting
//! participant in the proxied meeting system: invitees and attendees.
//!
//! ## Features
//!
//! - One trait per sub-resource ([`InviteeClient`], [`AttendeeClient`])
//! - Exponential backoff retry on transient statuses and network errors
//! - Status → error classification with transient/permanent split
//!
//! ## Example
//!
//! ```ignore
//! use convene_proxy::{InviteeClient, ProxyClient, ProxyConfig};
//!
//! let client = ProxyClient::new(ProxyConfig::new("https://proxy.example.com").with_api_key(key))?;
//! let invitee = client.get_invitee(&past_meeting_id, "inv-1").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod traits;

// Re-exports
pub use client::ProxyClient;
pub use config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use models::{
    Attendee, AttendeeSession, CreateAttendeeRequest, CreateInviteeRequest, Invitee,
    UpdateAttendeeRequest, UpdateInviteeRequest,
};
pub use retry::{LogVerbosity, RequestSafety, RetryConfig};
pub use traits::{AttendeeClient, InviteeClient};
