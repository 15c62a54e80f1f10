//! Past-meeting identifiers.
//!
//! A past meeting is addressed by its meeting id plus, for recurring
//! meetings, the occurrence id, joined with [`SEPARATOR`]:
//! `1234567890-1692164906` or just `1234567890`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Separator between the meeting and occurrence components.
pub const SEPARATOR: char = '-';

/// Composite identifier of a past meeting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PastMeetingId {
    meeting_id: String,
    occurrence_id: Option<String>,
}

impl PastMeetingId {
    /// Build an identifier from its components.
    ///
    /// The meeting id must be non-empty and neither component may contain
    /// [`SEPARATOR`], so the joined form always parses back to the same parts.
    pub fn new(meeting_id: impl Into<String>, occurrence_id: Option<String>) -> CoreResult<Self> {
        let meeting_id = meeting_id.into();
        let occurrence_id = occurrence_id.filter(|o| !o.is_empty());

        let reason = if meeting_id.is_empty() {
            Some("missing meeting id".to_string())
        } else if meeting_id.contains(SEPARATOR) {
            Some(format!("meeting id contains '{SEPARATOR}'"))
        } else if occurrence_id.as_deref().is_some_and(|o| o.contains(SEPARATOR)) {
            Some(format!("more than one '{SEPARATOR}' separator"))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidPastMeetingId {
                value: join(&meeting_id, occurrence_id.as_deref()),
                reason,
            }),
            None => Ok(Self {
                meeting_id,
                occurrence_id,
            }),
        }
    }

    /// Build an identifier where an empty occurrence means "no occurrence".
    pub fn from_parts(meeting_id: &str, occurrence_id: &str) -> CoreResult<Self> {
        let occurrence = (!occurrence_id.is_empty()).then(|| occurrence_id.to_string());
        Self::new(meeting_id, occurrence)
    }

    /// Parse the `meeting[-occurrence]` form.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(CoreError::InvalidPastMeetingId {
                value: value.to_string(),
                reason: "empty identifier".to_string(),
            });
        }

        let (meeting_id, occurrence_id) = value.split_once(SEPARATOR).unwrap_or((value, ""));
        Self::from_parts(meeting_id, occurrence_id)
    }

    /// The meeting component.
    #[must_use]
    pub fn meeting_id(&self) -> &str {
        &self.meeting_id
    }

    /// The occurrence component, if this is a recurring meeting occurrence.
    #[must_use]
    pub fn occurrence_id(&self) -> Option<&str> {
        self.occurrence_id.as_deref()
    }
}

fn join(meeting_id: &str, occurrence_id: Option<&str>) -> String {
    match occurrence_id {
        Some(occurrence) => format!("{meeting_id}{SEPARATOR}{occurrence}"),
        None => meeting_id.to_string(),
    }
}

impl fmt::Display for PastMeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.meeting_id, self.occurrence_id.as_deref()))
    }
}

impl FromStr for PastMeetingId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PastMeetingId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PastMeetingId> for String {
    fn from(id: PastMeetingId) -> Self {
        id.to_string()
    }
}

/// Join a meeting id and an (possibly empty) occurrence id.
pub fn get_past_meeting_id(meeting_id: &str, occurrence_id: &str) -> CoreResult<String> {
    PastMeetingId::from_parts(meeting_id, occurrence_id).map(|id| id.to_string())
}

/// Split a past-meeting id into `(meeting_id, occurrence_id)`.
///
/// The occurrence is empty when the id carries none. Unparseable input is
/// returned unchanged as the meeting component.
#[must_use]
pub fn parse_past_meeting_id(past_meeting_id: &str) -> (String, String) {
    match PastMeetingId::parse(past_meeting_id) {
        Ok(id) => (
            id.meeting_id().to_string(),
            id.occurrence_id().unwrap_or_default().to_string(),
        ),
        Err(_) => (past_meeting_id.to_string(), String::new()),
    }
}
