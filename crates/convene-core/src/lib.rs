//! convene Core Library
//!
//! Shared types for the convene meeting service.
//!
//! # Modules
//!
//! - [`past_meeting`] - Composite past-meeting identifier (meeting + occurrence)
//! - [`sub_resource`] - Invitee/attendee sub-resource kinds
//! - [`environment`] - Deployment environment detection (`APP_ENV`)
//! - [`error`] - Core error type (`CoreError`)
//!
//! # Example
//!
//! ```
//! use convene_core::PastMeetingId;
//!
//! let id = PastMeetingId::from_parts("1234567890", "1692164906")?;
//! assert_eq!(id.to_string(), "1234567890-1692164906");
//! assert_eq!(id.meeting_id(), "1234567890");
//! # Ok::<(), convene_core::CoreError>(())
//! ```

pub mod environment;
pub mod error;
pub mod past_meeting;
pub mod sub_resource;

pub use environment::AppEnvironment;
pub use error::{CoreError, CoreResult};
pub use past_meeting::{get_past_meeting_id, parse_past_meeting_id, PastMeetingId};
pub use sub_resource::SubResourceKind;
