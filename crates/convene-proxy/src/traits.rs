//! Sub-resource client traits.
//!
//! One capability per sub-resource kind, so the two sides of a participant
//! can be backed, faked and failed independently.

use async_trait::async_trait;
use convene_core::PastMeetingId;

use crate::error::ProxyResult;
use crate::models::{
    Attendee, CreateAttendeeRequest, CreateInviteeRequest, Invitee, UpdateAttendeeRequest,
    UpdateInviteeRequest,
};

/// CRUD on invitee records of a past meeting.
#[async_trait]
pub trait InviteeClient: Send + Sync {
    /// Create an invitee and return the stored document.
    async fn create_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        request: &CreateInviteeRequest,
    ) -> ProxyResult<Invitee>;

    /// Fetch an invitee. Absent invitees yield `ProxyError::NotFound`.
    async fn get_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        invitee_id: &str,
    ) -> ProxyResult<Invitee>;

    /// Apply a partial update and return the stored document.
    async fn update_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        invitee_id: &str,
        request: &UpdateInviteeRequest,
    ) -> ProxyResult<Invitee>;

    /// Delete an invitee. Absent invitees yield `ProxyError::NotFound`.
    async fn delete_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        invitee_id: &str,
    ) -> ProxyResult<()>;
}

/// CRUD on attendee records of a past meeting.
#[async_trait]
pub trait AttendeeClient: Send + Sync {
    /// Create an attendee and return the stored document.
    async fn create_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        request: &CreateAttendeeRequest,
    ) -> ProxyResult<Attendee>;

    /// Fetch an attendee. Absent attendees yield `ProxyError::NotFound`.
    async fn get_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        attendee_id: &str,
    ) -> ProxyResult<Attendee>;

    /// Apply a partial update and return the stored document.
    async fn update_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        attendee_id: &str,
        request: &UpdateAttendeeRequest,
    ) -> ProxyResult<Attendee>;

    /// Delete an attendee. Absent attendees yield `ProxyError::NotFound`.
    async fn delete_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        attendee_id: &str,
    ) -> ProxyResult<()>;
}
