//! Caller-facing participant types.

use chrono::{DateTime, Utc};
use convene_proxy::{
    AttendeeSession, CreateAttendeeRequest, CreateInviteeRequest, UpdateAttendeeRequest,
    UpdateInviteeRequest,
};
use serde::{Deserialize, Serialize};

/// One person's relationship to a past meeting, flattened from up to two
/// sub-resources.
///
/// A participant with neither `is_invited` nor `is_attended` set is absent
/// and is never handed back to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedParticipant {
    pub participant_id: String,
    pub past_meeting_id: String,
    /// Meeting component of `past_meeting_id`.
    pub meeting_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence_id: Option<String>,

    /// Present iff an invitee sub-resource exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitee_id: Option<String>,
    /// Present iff an attendee sub-resource exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_id: Option<String>,
    pub is_invited: bool,
    pub is_attended: bool,

    // Person fields
    #[serde(default)]
    pub first_name: String,
    /// Always empty when the person fields come from an attendee.
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lf_sso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lf_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_is_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_is_project_member: Option<bool>,

    // Committee fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_committee_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_voting_status: Option<String>,

    // Attendance-only fields, set only from an attendee document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unknown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_attendance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<AttendeeSession>,

    // Audit fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl MergedParticipant {
    /// True when at least one sub-resource backs this participant.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.is_invited || self.is_attended
    }
}

/// Input of `create_participant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateParticipantRequest {
    #[serde(default)]
    pub is_invited: bool,
    #[serde(default)]
    pub is_attended: bool,
    /// Required when `is_invited` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitee: Option<CreateInviteeRequest>,
    /// Required when `is_attended` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee: Option<CreateAttendeeRequest>,
}

/// Input of `update_participant`.
///
/// `None` for a desired flag leaves that side exactly as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateParticipantRequest {
    /// Invitee id from an earlier response, checked by reverse lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_invitee_id: Option<String>,
    /// Attendee id from an earlier response, checked by reverse lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub known_attendee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invited: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_attended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitee: Option<UpdateInviteeRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee: Option<UpdateAttendeeRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_defaults_to_no_opinion() {
        let request: UpdateParticipantRequest = serde_json::from_value(json!({
            "is_attended": true,
            "attendee": {"name": "Grace Hopper"}
        }))
        .unwrap();

        assert_eq!(request.is_invited, None);
        assert_eq!(request.is_attended, Some(true));
        assert!(request.invitee.is_none());
        assert_eq!(
            request.attendee.and_then(|a| a.name).as_deref(),
            Some("Grace Hopper")
        );
    }

    #[test]
    fn test_merged_participant_omits_absent_sides() {
        let participant = MergedParticipant {
            participant_id: "p-1".to_string(),
            past_meeting_id: "123".to_string(),
            meeting_id: "123".to_string(),
            invitee_id: Some("inv-1".to_string()),
            is_invited: true,
            first_name: "Ada".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&participant).unwrap();
        assert_eq!(value["invitee_id"], "inv-1");
        assert!(value.get("attendee_id").is_none());
        assert!(value.get("sessions").is_none());
        assert_eq!(value["is_attended"], false);
        assert!(participant.is_present());
    }
}
