//! Participant reconciliation.
//!
//! A participant is two independent remote records. Every call probes which
//! of them exist, decides one [`SideAction`] per side, runs both sides
//! concurrently and merges whatever succeeded. Nothing is rolled back: a side
//! that succeeded stays in place when the other fails.

use convene_core::{PastMeetingId, SubResourceKind};
use convene_idmap::IdMapper;
use convene_proxy::{
    Attendee, AttendeeClient, CreateAttendeeRequest, CreateInviteeRequest, Invitee,
    InviteeClient, ProxyError, UpdateAttendeeRequest, UpdateInviteeRequest,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{ReconcileError, ReconcileResult};
use crate::locks::ParticipantLocks;
use crate::merge::{merge_participant, SideState};
use crate::plan::SideAction;
use crate::prober::{ExistenceProber, IdMapperProber};
use crate::types::{CreateParticipantRequest, MergedParticipant, UpdateParticipantRequest};

/// Keeps participants consistent across their invitee and attendee records.
pub struct ParticipantReconciler {
    invitees: Arc<dyn InviteeClient>,
    attendees: Arc<dyn AttendeeClient>,
    mapper: Arc<dyn IdMapper>,
    prober: Arc<dyn ExistenceProber>,
    locks: ParticipantLocks,
}

impl ParticipantReconciler {
    /// Create a reconciler that probes existence through `mapper`.
    pub fn new(
        invitees: Arc<dyn InviteeClient>,
        attendees: Arc<dyn AttendeeClient>,
        mapper: Arc<dyn IdMapper>,
    ) -> Self {
        let prober = Arc::new(IdMapperProber::new(mapper.clone()));
        Self {
            invitees,
            attendees,
            mapper,
            prober,
            locks: ParticipantLocks::new(),
        }
    }

    /// Replace the existence prober.
    #[must_use]
    pub fn with_prober(mut self, prober: Arc<dyn ExistenceProber>) -> Self {
        self.prober = prober;
        self
    }

    /// Share per-participant locks with another reconciler.
    #[must_use]
    pub fn with_locks(mut self, locks: ParticipantLocks) -> Self {
        self.locks = locks;
        self
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Create the requested sub-resources for a new participant.
    ///
    /// Both sides run regardless of each other. A failure on either side is
    /// returned as an error even if the other side was created; the external
    /// system owns cleanup of that orphan.
    #[instrument(skip(self, request), fields(past_meeting_id = %past_meeting_id))]
    pub async fn create_participant(
        &self,
        past_meeting_id: &PastMeetingId,
        request: CreateParticipantRequest,
    ) -> ReconcileResult<MergedParticipant> {
        if !request.is_invited && !request.is_attended {
            return Err(ReconcileError::validation(
                "at least one of is_invited or is_attended must be set",
            ));
        }
        if request.is_invited && request.invitee.is_none() {
            return Err(ReconcileError::validation(
                "is_invited requires an invitee payload",
            ));
        }
        if request.is_attended && request.attendee.is_none() {
            return Err(ReconcileError::validation(
                "is_attended requires an attendee payload",
            ));
        }

        let invitee_body = request.invitee.as_ref().filter(|_| request.is_invited);
        let attendee_body = request.attendee.as_ref().filter(|_| request.is_attended);

        let (invitee, attendee) = tokio::join!(
            self.create_invitee_side(past_meeting_id, invitee_body),
            self.create_attendee_side(past_meeting_id, attendee_body),
        );

        let (invitee, attendee) = match (invitee, attendee) {
            (Ok(invitee), Ok(attendee)) => (invitee, attendee),
            (Err(invitee_err), Err(attendee_err)) => {
                return Err(ReconcileError::aggregate(invitee_err, attendee_err));
            }
            (Ok(invitee), Err(e)) => {
                if let Some(id) = invitee.id() {
                    warn!(
                        invitee_id = %id,
                        error = %e,
                        "Attendee creation failed, invitee left in place"
                    );
                }
                return Err(e);
            }
            (Err(e), Ok(attendee)) => {
                if let Some(id) = attendee.id() {
                    warn!(
                        attendee_id = %id,
                        error = %e,
                        "Invitee creation failed, attendee left in place"
                    );
                }
                return Err(e);
            }
        };

        let participant_id = self.assign_participant_id(&invitee, &attendee).await;
        let merged = merge_participant(past_meeting_id, &participant_id, &invitee, &attendee);

        info!(
            participant_id = %merged.participant_id,
            is_invited = merged.is_invited,
            is_attended = merged.is_attended,
            "Participant created"
        );
        Ok(merged)
    }

    async fn create_invitee_side(
        &self,
        past_meeting_id: &PastMeetingId,
        body: Option<&CreateInviteeRequest>,
    ) -> ReconcileResult<SideState<Invitee>> {
        let Some(body) = body else {
            return Ok(SideState::Absent);
        };
        let invitee = self
            .invitees
            .create_invitee(past_meeting_id, body)
            .await
            .map_err(|e| ReconcileError::sub_resource(SubResourceKind::Invitee, e))?;
        Ok(SideState::with_document(invitee.uuid.clone(), invitee))
    }

    async fn create_attendee_side(
        &self,
        past_meeting_id: &PastMeetingId,
        body: Option<&CreateAttendeeRequest>,
    ) -> ReconcileResult<SideState<Attendee>> {
        let Some(body) = body else {
            return Ok(SideState::Absent);
        };
        let attendee = self
            .attendees
            .create_attendee(past_meeting_id, body)
            .await
            .map_err(|e| ReconcileError::sub_resource(SubResourceKind::Attendee, e))?;
        Ok(SideState::with_document(attendee.id.clone(), attendee))
    }

    /// Reverse-resolve the new sub-resources to a participant id.
    ///
    /// Falls back to the raw invitee id, then the raw attendee id, while the
    /// mapping has not propagated yet.
    async fn assign_participant_id(
        &self,
        invitee: &SideState<Invitee>,
        attendee: &SideState<Attendee>,
    ) -> String {
        let candidates = [
            (SubResourceKind::Invitee, invitee.id()),
            (SubResourceKind::Attendee, attendee.id()),
        ];

        for (kind, id) in candidates {
            let Some(id) = id else { continue };
            match self.mapper.participant_id(kind, id).await {
                Ok(Some(participant_id)) if !participant_id.is_empty() => return participant_id,
                Ok(_) => debug!(kind = %kind, id = %id, "No participant mapping yet"),
                Err(e) => debug!(kind = %kind, id = %id, error = %e, "Participant lookup failed"),
            }
        }

        invitee
            .id()
            .or_else(|| attendee.id())
            .unwrap_or_default()
            .to_string()
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Bring both sides in line with the desired flags and apply field updates.
    ///
    /// Failed deletes are logged and the side is reported as removed. When one
    /// side fails and the other succeeds the error is
    /// [`ReconcileError::Partial`], carrying the merged result.
    #[instrument(
        skip(self, request),
        fields(past_meeting_id = %past_meeting_id, participant_id = %participant_id)
    )]
    pub async fn update_participant(
        &self,
        past_meeting_id: &PastMeetingId,
        participant_id: &str,
        request: UpdateParticipantRequest,
    ) -> ReconcileResult<MergedParticipant> {
        if participant_id.is_empty() {
            return Err(ReconcileError::validation("participant_id is required"));
        }
        if request.is_invited == Some(false) && request.is_attended == Some(false) {
            return Err(ReconcileError::validation(
                "a participant must stay invited or attended; delete it instead",
            ));
        }

        let _guard = self.locks.lock(&lock_key(past_meeting_id, participant_id)).await;

        let (invitee_id, attendee_id) = tokio::join!(
            self.prober
                .exists_as_invitee(participant_id, request.known_invitee_id.as_deref()),
            self.prober
                .exists_as_attendee(participant_id, request.known_attendee_id.as_deref()),
        );

        let invitee_action = SideAction::decide(
            request.is_invited,
            invitee_id.is_some(),
            request.invitee.is_some(),
        );
        let attendee_action = SideAction::decide(
            request.is_attended,
            attendee_id.is_some(),
            request.attendee.is_some(),
        );

        debug!(
            invitee_exists = invitee_id.is_some(),
            attendee_exists = attendee_id.is_some(),
            invitee_action = %invitee_action,
            attendee_action = %attendee_action,
            "Planned participant update"
        );

        let (invitee, attendee) = tokio::join!(
            self.apply_invitee(
                past_meeting_id,
                invitee_action,
                invitee_id.clone(),
                request.invitee.as_ref(),
            ),
            self.apply_attendee(
                past_meeting_id,
                attendee_action,
                attendee_id.clone(),
                request.attendee.as_ref(),
            ),
        );

        let merge = |invitee: &SideState<Invitee>, attendee: &SideState<Attendee>| {
            merge_participant(past_meeting_id, participant_id, invitee, attendee)
        };

        match (invitee, attendee) {
            (Ok(invitee), Ok(attendee)) => {
                let merged = merge(&invitee, &attendee);
                if !merged.is_present() {
                    return Err(ReconcileError::NotFound {
                        participant_id: participant_id.to_string(),
                    });
                }
                info!(
                    is_invited = merged.is_invited,
                    is_attended = merged.is_attended,
                    "Participant updated"
                );
                Ok(merged)
            }
            (Err(invitee_err), Err(attendee_err)) => {
                Err(ReconcileError::aggregate(invitee_err, attendee_err))
            }
            (Ok(invitee), Err(failure)) => {
                partial(merge(&invitee, &SideState::from_id(attendee_id)), failure)
            }
            (Err(failure), Ok(attendee)) => {
                partial(merge(&SideState::from_id(invitee_id), &attendee), failure)
            }
        }
    }

    async fn apply_invitee(
        &self,
        past_meeting_id: &PastMeetingId,
        action: SideAction,
        current_id: Option<String>,
        payload: Option<&UpdateInviteeRequest>,
    ) -> ReconcileResult<SideState<Invitee>> {
        let kind = SubResourceKind::Invitee;
        match (action, current_id, payload) {
            (SideAction::Create, _, Some(payload)) => {
                self.create_invitee_side(past_meeting_id, Some(&CreateInviteeRequest::from(payload)))
                    .await
            }
            (SideAction::Update, Some(id), Some(payload)) => {
                match self.invitees.update_invitee(past_meeting_id, &id, payload).await {
                    Ok(invitee) => Ok(SideState::with_document(id, invitee)),
                    Err(e) if e.is_not_found() => {
                        warn!(invitee_id = %id, "Mapped invitee is gone, recreating it");
                        self.create_invitee_side(
                            past_meeting_id,
                            Some(&CreateInviteeRequest::from(payload)),
                        )
                        .await
                    }
                    Err(e) => Err(ReconcileError::sub_resource(kind, e)),
                }
            }
            (SideAction::Delete, Some(id), _) => {
                let result = self.invitees.delete_invitee(past_meeting_id, &id).await;
                log_drift_delete(kind, &id, result);
                Ok(SideState::Absent)
            }
            (_, current_id, _) => Ok(SideState::from_id(current_id)),
        }
    }

    async fn apply_attendee(
        &self,
        past_meeting_id: &PastMeetingId,
        action: SideAction,
        current_id: Option<String>,
        payload: Option<&UpdateAttendeeRequest>,
    ) -> ReconcileResult<SideState<Attendee>> {
        let kind = SubResourceKind::Attendee;
        match (action, current_id, payload) {
            (SideAction::Create, _, Some(payload)) => {
                self.create_attendee_side(
                    past_meeting_id,
                    Some(&CreateAttendeeRequest::from(payload)),
                )
                .await
            }
            (SideAction::Update, Some(id), Some(payload)) => {
                match self.attendees.update_attendee(past_meeting_id, &id, payload).await {
                    Ok(attendee) => Ok(SideState::with_document(id, attendee)),
                    Err(e) if e.is_not_found() => {
                        warn!(attendee_id = %id, "Mapped attendee is gone, recreating it");
                        self.create_attendee_side(
                            past_meeting_id,
                            Some(&CreateAttendeeRequest::from(payload)),
                        )
                        .await
                    }
                    Err(e) => Err(ReconcileError::sub_resource(kind, e)),
                }
            }
            (SideAction::Delete, Some(id), _) => {
                let result = self.attendees.delete_attendee(past_meeting_id, &id).await;
                log_drift_delete(kind, &id, result);
                Ok(SideState::Absent)
            }
            (_, current_id, _) => Ok(SideState::from_id(current_id)),
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Remove both sub-resources.
    ///
    /// Absent sub-resources count as deleted. Fails only when both sides fail.
    #[instrument(
        skip(self),
        fields(past_meeting_id = %past_meeting_id, participant_id = %participant_id)
    )]
    pub async fn delete_participant(
        &self,
        past_meeting_id: &PastMeetingId,
        participant_id: &str,
    ) -> ReconcileResult<()> {
        if participant_id.is_empty() {
            return Err(ReconcileError::validation("participant_id is required"));
        }

        let _guard = self.locks.lock(&lock_key(past_meeting_id, participant_id)).await;

        let (invitee_lookup, attendee_lookup) = tokio::join!(
            self.prober
                .lookup(SubResourceKind::Invitee, participant_id, None),
            self.prober
                .lookup(SubResourceKind::Attendee, participant_id, None),
        );
        if invitee_lookup.is_unknown() && attendee_lookup.is_unknown() {
            warn!(
                mapper = self.mapper.name(),
                "Identifier lookups failed on both sides, nothing deleted"
            );
            return Ok(());
        }
        let invitee_id = invitee_lookup.into_id();
        let attendee_id = attendee_lookup.into_id();

        let (invitee, attendee) = tokio::join!(
            async {
                match invitee_id.as_deref() {
                    Some(id) => self.invitees.delete_invitee(past_meeting_id, id).await,
                    None => Ok(()),
                }
            },
            async {
                match attendee_id.as_deref() {
                    Some(id) => self.attendees.delete_attendee(past_meeting_id, id).await,
                    None => Ok(()),
                }
            },
        );

        let invitee = absorb_not_found(SubResourceKind::Invitee, invitee);
        let attendee = absorb_not_found(SubResourceKind::Attendee, attendee);

        match (invitee, attendee) {
            (Err(invitee_err), Err(attendee_err)) => {
                Err(ReconcileError::aggregate(invitee_err, attendee_err))
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => {
                warn!(error = %e, "Participant deleted on one side only");
                Ok(())
            }
            (Ok(()), Ok(())) => {
                info!(
                    invitee_deleted = invitee_id.is_some(),
                    attendee_deleted = attendee_id.is_some(),
                    "Participant deleted"
                );
                Ok(())
            }
        }
    }

    // =========================================================================
    // Get
    // =========================================================================

    /// Read the current merged view of a participant.
    #[instrument(
        skip(self),
        fields(past_meeting_id = %past_meeting_id, participant_id = %participant_id)
    )]
    pub async fn get_participant(
        &self,
        past_meeting_id: &PastMeetingId,
        participant_id: &str,
    ) -> ReconcileResult<MergedParticipant> {
        if participant_id.is_empty() {
            return Err(ReconcileError::validation("participant_id is required"));
        }

        let _guard = self.locks.lock(&lock_key(past_meeting_id, participant_id)).await;

        let (invitee_id, attendee_id) = tokio::join!(
            self.prober.exists_as_invitee(participant_id, None),
            self.prober.exists_as_attendee(participant_id, None),
        );

        let (invitee, attendee) = tokio::join!(
            async {
                match invitee_id {
                    Some(id) => read_side(
                        SubResourceKind::Invitee,
                        self.invitees.get_invitee(past_meeting_id, &id).await,
                        id,
                    ),
                    None => Ok(SideState::Absent),
                }
            },
            async {
                match attendee_id {
                    Some(id) => read_side(
                        SubResourceKind::Attendee,
                        self.attendees.get_attendee(past_meeting_id, &id).await,
                        id,
                    ),
                    None => Ok(SideState::Absent),
                }
            },
        );

        let (invitee, attendee) = match (invitee, attendee) {
            (Err(invitee_err), Err(attendee_err)) => {
                return Err(ReconcileError::aggregate(invitee_err, attendee_err));
            }
            (Ok(invitee), Ok(attendee)) => (invitee, attendee),
            (Ok(invitee), Err(e)) => {
                warn!(error = %e, "Attendee read failed, omitting it");
                if !invitee.is_present() {
                    return Err(e);
                }
                (invitee, SideState::Absent)
            }
            (Err(e), Ok(attendee)) => {
                warn!(error = %e, "Invitee read failed, omitting it");
                if !attendee.is_present() {
                    return Err(e);
                }
                (SideState::Absent, attendee)
            }
        };

        let merged = merge_participant(past_meeting_id, participant_id, &invitee, &attendee);
        if !merged.is_present() {
            return Err(ReconcileError::NotFound {
                participant_id: participant_id.to_string(),
            });
        }
        Ok(merged)
    }
}

fn lock_key(past_meeting_id: &PastMeetingId, participant_id: &str) -> String {
    format!("{past_meeting_id}/{participant_id}")
}

fn partial(
    participant: MergedParticipant,
    failure: ReconcileError,
) -> ReconcileResult<MergedParticipant> {
    if !participant.is_present() {
        return Err(failure);
    }
    warn!(
        error = %failure,
        is_invited = participant.is_invited,
        is_attended = participant.is_attended,
        "Participant partially updated"
    );
    Err(ReconcileError::Partial {
        participant: Box::new(participant),
        failure: Box::new(failure),
    })
}

/// Deletes during an update are drift, not failure.
fn log_drift_delete(kind: SubResourceKind, id: &str, result: Result<(), ProxyError>) {
    match result {
        Ok(()) => info!(kind = %kind, id = %id, "Sub-resource deleted"),
        Err(e) if e.is_not_found() => debug!(kind = %kind, id = %id, "Sub-resource already gone"),
        Err(e) => warn!(kind = %kind, id = %id, error = %e, "Delete failed, continuing"),
    }
}

fn absorb_not_found(kind: SubResourceKind, result: Result<(), ProxyError>) -> ReconcileResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            debug!(kind = %kind, "Sub-resource already gone");
            Ok(())
        }
        Err(e) => Err(ReconcileError::sub_resource(kind, e)),
    }
}

fn read_side<D>(
    kind: SubResourceKind,
    result: Result<D, ProxyError>,
    id: String,
) -> ReconcileResult<SideState<D>> {
    match result {
        Ok(document) => Ok(SideState::with_document(id, document)),
        Err(e) if e.is_not_found() => {
            debug!(kind = %kind, id = %id, "Mapped sub-resource is gone");
            Ok(SideState::Absent)
        }
        Err(e) => Err(ReconcileError::sub_resource(kind, e)),
    }
}
