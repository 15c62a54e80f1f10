//! The `IdMapper` capability and its pass-through implementation.

use async_trait::async_trait;
use convene_core::SubResourceKind;
use std::fmt;
use tracing::warn;

use crate::error::IdMapResult;

/// Direction of a lookup between the current participant id space and the
/// legacy sub-resource id spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdNamespace {
    ParticipantToInvitee,
    InviteeToParticipant,
    ParticipantToAttendee,
    AttendeeToParticipant,
}

impl IdNamespace {
    /// Participant id → sub-resource id.
    #[must_use]
    pub fn forward(kind: SubResourceKind) -> Self {
        match kind {
            SubResourceKind::Invitee => Self::ParticipantToInvitee,
            SubResourceKind::Attendee => Self::ParticipantToAttendee,
        }
    }

    /// Sub-resource id → participant id.
    #[must_use]
    pub fn reverse(kind: SubResourceKind) -> Self {
        match kind {
            SubResourceKind::Invitee => Self::InviteeToParticipant,
            SubResourceKind::Attendee => Self::AttendeeToParticipant,
        }
    }

    /// The sub-resource kind on the legacy side of this lookup.
    #[must_use]
    pub fn kind(&self) -> SubResourceKind {
        match self {
            Self::ParticipantToInvitee | Self::InviteeToParticipant => SubResourceKind::Invitee,
            Self::ParticipantToAttendee | Self::AttendeeToParticipant => SubResourceKind::Attendee,
        }
    }

    /// Subject suffix for this namespace.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParticipantToInvitee => "participant_to_invitee",
            Self::InviteeToParticipant => "invitee_to_participant",
            Self::ParticipantToAttendee => "participant_to_attendee",
            Self::AttendeeToParticipant => "attendee_to_participant",
        }
    }
}

impl fmt::Display for IdNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves identifiers between the two id spaces.
///
/// `Ok(None)` means the lookup service answered and has no mapping;
/// an `Err` means the service could not be asked.
#[async_trait]
pub trait IdMapper: Send + Sync {
    /// Short name of the implementation, for logs.
    fn name(&self) -> &'static str;

    /// Resolve `source_id` within `namespace`.
    async fn resolve(&self, namespace: IdNamespace, source_id: &str)
        -> IdMapResult<Option<String>>;

    /// Participant id → invitee/attendee id.
    async fn sub_resource_id(
        &self,
        kind: SubResourceKind,
        participant_id: &str,
    ) -> IdMapResult<Option<String>> {
        self.resolve(IdNamespace::forward(kind), participant_id)
            .await
    }

    /// Invitee/attendee id → participant id.
    async fn participant_id(
        &self,
        kind: SubResourceKind,
        sub_resource_id: &str,
    ) -> IdMapResult<Option<String>> {
        self.resolve(IdNamespace::reverse(kind), sub_resource_id)
            .await
    }
}

/// Pass-through mapper for deployments without the lookup service.
///
/// Every lookup returns its input, so every participant appears to have both
/// sub-resources under the participant's own id.
#[derive(Debug)]
pub struct NoopIdMapper {
    _private: (),
}

impl NoopIdMapper {
    /// Create the pass-through mapper. Always logs at WARN.
    #[must_use]
    pub fn new() -> Self {
        warn!("Identifier mapping disabled: ids pass through unchanged");
        Self { _private: () }
    }
}

impl Default for NoopIdMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdMapper for NoopIdMapper {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn resolve(
        &self,
        _namespace: IdNamespace,
        source_id: &str,
    ) -> IdMapResult<Option<String>> {
        if source_id.is_empty() {
            return Ok(None);
        }
        Ok(Some(source_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_directions() {
        for kind in SubResourceKind::ALL {
            assert_eq!(IdNamespace::forward(kind).kind(), kind);
            assert_eq!(IdNamespace::reverse(kind).kind(), kind);
            assert_ne!(IdNamespace::forward(kind), IdNamespace::reverse(kind));
        }
        assert_eq!(
            IdNamespace::forward(SubResourceKind::Invitee).as_str(),
            "participant_to_invitee"
        );
        assert_eq!(
            IdNamespace::reverse(SubResourceKind::Attendee).to_string(),
            "attendee_to_participant"
        );
    }

    #[tokio::test]
    async fn test_noop_passes_ids_through() {
        let mapper = NoopIdMapper::new();
        assert_eq!(mapper.name(), "noop");
        assert_eq!(
            mapper
                .sub_resource_id(SubResourceKind::Invitee, "p-1")
                .await
                .unwrap(),
            Some("p-1".to_string())
        );
        assert_eq!(
            mapper
                .participant_id(SubResourceKind::Attendee, "a-9")
                .await
                .unwrap(),
            Some("a-9".to_string())
        );
        assert_eq!(
            mapper
                .resolve(IdNamespace::ParticipantToAttendee, "")
                .await
                .unwrap(),
            None
        );
    }
}
