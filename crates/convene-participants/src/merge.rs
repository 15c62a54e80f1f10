//! Projection of the invitee and attendee documents onto one participant.
//!
//! Precedence:
//!
//! - an invitee document supplies every person, committee and audit field;
//! - an attendee document supplies the attendance-only fields, and the person
//!   and committee fields only when no invitee exists, with its `name` copied
//!   verbatim into `first_name`;
//! - `meeting_id`/`occurrence_id` always come from the past-meeting id.

use convene_core::PastMeetingId;
use convene_proxy::{Attendee, Invitee};

use crate::types::MergedParticipant;

/// What is known about one side of a participant after reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum SideState<D> {
    /// No sub-resource on this side.
    Absent,
    /// The sub-resource exists. `document` is set when it was written or read
    /// during this request.
    Present { id: String, document: Option<D> },
}

impl<D> SideState<D> {
    /// Side that exists but was not touched.
    pub fn untouched(id: impl Into<String>) -> Self {
        Self::Present {
            id: id.into(),
            document: None,
        }
    }

    /// Side that exists with the document just returned by the proxy.
    pub fn with_document(id: impl Into<String>, document: D) -> Self {
        Self::Present {
            id: id.into(),
            document: Some(document),
        }
    }

    /// Present iff `id` is `Some`.
    pub fn from_id(id: Option<String>) -> Self {
        id.map_or(Self::Absent, Self::untouched)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Present { id, .. } => Some(id),
            Self::Absent => None,
        }
    }

    pub fn document(&self) -> Option<&D> {
        match self {
            Self::Present { document, .. } => document.as_ref(),
            Self::Absent => None,
        }
    }
}

/// Flatten both sides into the caller-facing participant.
#[must_use]
pub fn merge_participant(
    past_meeting_id: &PastMeetingId,
    participant_id: &str,
    invitee: &SideState<Invitee>,
    attendee: &SideState<Attendee>,
) -> MergedParticipant {
    let mut merged = MergedParticipant {
        participant_id: participant_id.to_string(),
        past_meeting_id: past_meeting_id.to_string(),
        meeting_id: past_meeting_id.meeting_id().to_string(),
        occurrence_id: past_meeting_id.occurrence_id().map(str::to_string),
        invitee_id: invitee.id().map(str::to_string),
        attendee_id: attendee.id().map(str::to_string),
        is_invited: invitee.is_present(),
        is_attended: attendee.is_present(),
        ..Default::default()
    };

    // An invitee that exists but was not read this time still outranks the
    // attendee, so its person fields stay unset.
    match (invitee, attendee.document()) {
        (SideState::Present { document: Some(doc), .. }, _) => apply_invitee(&mut merged, doc),
        (SideState::Absent, Some(doc)) => apply_attendee_person(&mut merged, doc),
        _ => {}
    }

    if let Some(doc) = attendee.document() {
        apply_attendance(&mut merged, doc);
    }

    merged
}

fn apply_invitee(merged: &mut MergedParticipant, doc: &Invitee) {
    merged.first_name = doc.first_name.clone().unwrap_or_default();
    merged.last_name = doc.last_name.clone().unwrap_or_default();
    merged.email = doc.primary_email.clone().unwrap_or_default();
    merged.lf_sso = doc.lf_sso.clone();
    merged.lf_user_id = doc.lf_user_id.clone();
    merged.org = doc.org.clone();
    merged.job_title = doc.job_title.clone();
    merged.profile_picture = doc.profile_picture.clone();
    merged.org_is_member = doc.org_is_member;
    merged.org_is_project_member = doc.org_is_project_member;

    merged.committee_id = doc.committee_id.clone();
    merged.committee_role = doc.committee_role.clone();
    merged.is_committee_member = doc.is_committee_member;
    merged.committee_voting_status = doc.committee_voting_status.clone();

    merged.created_at = doc.created_at;
    merged.created_by = doc.created_by.clone();
    merged.modified_at = doc.modified_at;
    merged.updated_by = doc.updated_by.clone();
}

fn apply_attendee_person(merged: &mut MergedParticipant, doc: &Attendee) {
    // No name splitting.
    merged.first_name = doc.name.clone().unwrap_or_default();
    merged.last_name = String::new();
    merged.email = doc.email.clone().unwrap_or_default();
    merged.lf_sso = doc.lf_sso.clone();
    merged.lf_user_id = doc.lf_user_id.clone();
    merged.org = doc.org.clone();
    merged.job_title = doc.job_title.clone();
    merged.profile_picture = doc.profile_picture.clone();
    merged.org_is_member = doc.org_is_member;
    merged.org_is_project_member = doc.org_is_project_member;

    merged.committee_id = doc.committee_id.clone();
    merged.committee_role = doc.committee_role.clone();
    merged.is_committee_member = doc.is_committee_member;
    merged.committee_voting_status = doc.committee_voting_status.clone();
}

fn apply_attendance(merged: &mut MergedParticipant, doc: &Attendee) {
    merged.is_verified = Some(doc.is_verified);
    merged.is_unknown = Some(doc.is_unknown);
    merged.average_attendance = doc.average_attendance;
    merged.sessions = doc.sessions.clone();
}
