//! Error types for participant reconciliation.

use convene_core::SubResourceKind;
use convene_proxy::ProxyError;
use thiserror::Error;

use crate::types::MergedParticipant;

/// Errors surfaced by [`ParticipantReconciler`](crate::ParticipantReconciler).
///
/// Identifier lookups never show up here: existence probes absorb them.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The request was rejected before any remote call was made.
    #[error("Invalid participant request: {message}")]
    Validation { message: String },

    /// Neither sub-resource exists for the participant.
    #[error("Participant not found: {participant_id}")]
    NotFound { participant_id: String },

    /// A create/read/update/delete on one sub-resource failed.
    #[error("{kind} operation failed: {source}")]
    SubResource {
        kind: SubResourceKind,
        #[source]
        source: ProxyError,
    },

    /// Both sides failed. Neither error is dropped.
    #[error("Invitee and attendee operations both failed (invitee: {invitee}; attendee: {attendee})")]
    Aggregate {
        invitee: Box<ReconcileError>,
        attendee: Box<ReconcileError>,
    },

    /// One side failed after the other succeeded.
    ///
    /// `participant` is the best-effort merged view of what is now stored.
    #[error("Participant partially reconciled: {failure}")]
    Partial {
        participant: Box<MergedParticipant>,
        #[source]
        failure: Box<ReconcileError>,
    },
}

impl ReconcileError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn sub_resource(kind: SubResourceKind, source: ProxyError) -> Self {
        Self::SubResource { kind, source }
    }

    pub(crate) fn aggregate(invitee: ReconcileError, attendee: ReconcileError) -> Self {
        Self::Aggregate {
            invitee: Box::new(invitee),
            attendee: Box::new(attendee),
        }
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Validation { .. } | Self::NotFound { .. } => false,
            Self::SubResource { source, .. } => source.is_transient(),
            Self::Aggregate { invitee, attendee } => {
                invitee.is_transient() || attendee.is_transient()
            }
            Self::Partial { failure, .. } => failure.is_transient(),
        }
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_FAILED",
            Self::NotFound { .. } => "PARTICIPANT_NOT_FOUND",
            Self::SubResource { source, .. } => source.error_code(),
            Self::Aggregate { .. } => "BOTH_SIDES_FAILED",
            Self::Partial { .. } => "PARTIAL_RECONCILIATION",
        }
    }

    /// The best-effort participant carried by a partial failure.
    pub fn participant(&self) -> Option<&MergedParticipant> {
        match self {
            Self::Partial { participant, .. } => Some(participant.as_ref()),
            _ => None,
        }
    }

    /// Sub-resource kinds whose operation failed.
    pub fn failed_kinds(&self) -> Vec<SubResourceKind> {
        match self {
            Self::SubResource { kind, .. } => vec![*kind],
            Self::Aggregate { invitee, attendee } => {
                let mut kinds = invitee.failed_kinds();
                kinds.extend(attendee.failed_kinds());
                kinds
            }
            Self::Partial { failure, .. } => failure.failed_kinds(),
            Self::Validation { .. } | Self::NotFound { .. } => Vec::new(),
        }
    }
}

/// Result type for reconciliation.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable(kind: SubResourceKind) -> ReconcileError {
        ReconcileError::sub_resource(
            kind,
            ProxyError::Unavailable {
                status: 503,
                message: "down".to_string(),
            },
        )
    }

    #[test]
    fn test_aggregate_keeps_both_errors() {
        let err = ReconcileError::aggregate(
            unavailable(SubResourceKind::Invitee),
            ReconcileError::sub_resource(
                SubResourceKind::Attendee,
                ProxyError::Unauthorized { status: 403 },
            ),
        );

        let message = err.to_string();
        assert!(message.contains("invitee operation failed"));
        assert!(message.contains("attendee operation failed"));
        assert_eq!(
            err.failed_kinds(),
            vec![SubResourceKind::Invitee, SubResourceKind::Attendee]
        );
        assert!(err.is_transient());
        assert_eq!(err.error_code(), "BOTH_SIDES_FAILED");
    }

    #[test]
    fn test_partial_exposes_participant() {
        let err = ReconcileError::Partial {
            participant: Box::new(MergedParticipant {
                participant_id: "p-1".to_string(),
                is_invited: true,
                ..Default::default()
            }),
            failure: Box::new(unavailable(SubResourceKind::Attendee)),
        };

        assert_eq!(err.participant().map(|p| p.participant_id.as_str()), Some("p-1"));
        assert_eq!(err.failed_kinds(), vec![SubResourceKind::Attendee]);
        assert!(err.is_transient());
    }

    #[test]
    fn test_validation_is_permanent() {
        let err = ReconcileError::validation("nothing requested");
        assert!(!err.is_transient());
        assert!(err.participant().is_none());
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }
}
