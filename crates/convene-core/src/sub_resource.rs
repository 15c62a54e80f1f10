//! Kinds of remote sub-resource backing a past-meeting participant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independently addressable records that together make up one
/// past-meeting participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubResourceKind {
    /// "This person was invited."
    Invitee,
    /// "This person attended", with session-level join/leave data.
    Attendee,
}

impl SubResourceKind {
    /// Both kinds, invitee first.
    pub const ALL: [SubResourceKind; 2] = [SubResourceKind::Invitee, SubResourceKind::Attendee];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invitee => "invitee",
            Self::Attendee => "attendee",
        }
    }

    /// Collection name used in proxy URLs (`invitees`, `attendees`).
    #[must_use]
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Invitee => "invitees",
            Self::Attendee => "attendees",
        }
    }
}

impl fmt::Display for SubResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(SubResourceKind::Invitee.to_string(), "invitee");
        assert_eq!(SubResourceKind::Attendee.collection(), "attendees");
        assert_eq!(
            serde_json::to_string(&SubResourceKind::Attendee).unwrap(),
            "\"attendee\""
        );
    }
}
