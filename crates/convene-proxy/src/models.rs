//! Wire documents of the proxied meeting system.
//!
//! The proxy owns these documents. Neither one points at the other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// "This person was invited to the past meeting."
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invitee {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
    /// External SSO username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lf_sso: Option<String>,
    /// Legacy user id.
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_committee_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_voting_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// One join/leave interval of an attendee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeSession {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_reason: Option<String>,
}

/// "This person attended the past meeting."
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: String,
    /// Display name; never split into first/last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_committee_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_voting_status: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_unknown: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_attendance: Option<f64>,
    #[serde(default)]
    pub sessions: Vec<AttendeeSession>,
}

/// Body of `POST .../invitees`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateInviteeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub primary_email: String,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_committee_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_voting_status: Option<String>,
}

/// Body of `PUT .../invitees/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateInviteeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_committee_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_voting_status: Option<String>,
}

/// Best-effort mapping used when an update has to create the invitee.
impl From<&UpdateInviteeRequest> for CreateInviteeRequest {
    fn from(update: &UpdateInviteeRequest) -> Self {
        Self {
            first_name: update.first_name.clone().unwrap_or_default(),
            last_name: update.last_name.clone().unwrap_or_default(),
            primary_email: update.primary_email.clone().unwrap_or_default(),
            lf_sso: update.lf_sso.clone(),
            lf_user_id: update.lf_user_id.clone(),
            org: update.org.clone(),
            job_title: update.job_title.clone(),
            profile_picture: update.profile_picture.clone(),
            org_is_member: update.org_is_member,
            org_is_project_member: update.org_is_project_member,
            committee_id: update.committee_id.clone(),
            committee_role: update.committee_role.clone(),
            is_committee_member: update.is_committee_member,
            committee_voting_status: update.committee_voting_status.clone(),
        }
    }
}

/// Body of `POST .../attendees`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateAttendeeRequest {
    #[serde(default)]
    pub name: String,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_committee_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_voting_status: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_unknown: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sessions: Vec<AttendeeSession>,
}

/// Body of `PUT .../attendees/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAttendeeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_committee_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committee_voting_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unknown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<Vec<AttendeeSession>>,
}

/// Best-effort mapping used when an update has to create the attendee.
impl From<&UpdateAttendeeRequest> for CreateAttendeeRequest {
    fn from(update: &UpdateAttendeeRequest) -> Self {
        Self {
            name: update.name.clone().unwrap_or_default(),
            email: update.email.clone().unwrap_or_default(),
            lf_sso: update.lf_sso.clone(),
            lf_user_id: update.lf_user_id.clone(),
            org: update.org.clone(),
            job_title: update.job_title.clone(),
            profile_picture: update.profile_picture.clone(),
            org_is_member: update.org_is_member,
            org_is_project_member: update.org_is_project_member,
            committee_id: update.committee_id.clone(),
            committee_role: update.committee_role.clone(),
            is_committee_member: update.is_committee_member,
            committee_voting_status: update.committee_voting_status.clone(),
            is_verified: update.is_verified.unwrap_or(false),
            is_unknown: update.is_unknown.unwrap_or(false),
            sessions: update.sessions.clone().unwrap_or_default(),
        }
    }
}
