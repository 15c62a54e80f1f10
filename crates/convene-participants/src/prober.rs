//! Existence probing on top of the identifier bridge.
//!
//! The proxy has no "exists" endpoint, so a sub-resource is taken to exist
//! when the bridge can map the participant to it. Probes are advisory:
//! lookup failures are logged and read as "does not exist".

use async_trait::async_trait;
use convene_core::SubResourceKind;
use convene_idmap::IdMapper;
use std::sync::Arc;
use tracing::debug;

/// Outcome of one existence lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The sub-resource exists under this id.
    Found(String),
    /// The bridge answered and holds no matching mapping.
    Absent,
    /// The bridge could not be asked.
    Unknown,
}

impl Lookup {
    /// The found id. `Absent` and `Unknown` both read as "does not exist".
    #[must_use]
    pub fn into_id(self) -> Option<String> {
        match self {
            Self::Found(id) => Some(id),
            Self::Absent | Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Answers "does this participant currently have an invitee/attendee?".
#[async_trait]
pub trait ExistenceProber: Send + Sync {
    /// Id of the `kind` sub-resource backing `participant_id`, if any.
    ///
    /// With `known_id` set, only that id is checked, and it counts only when
    /// it maps back to `participant_id`.
    async fn probe(
        &self,
        kind: SubResourceKind,
        participant_id: &str,
        known_id: Option<&str>,
    ) -> Option<String>;

    /// Same as [`probe`](Self::probe), keeping failed lookups apart from
    /// missing mappings.
    async fn lookup(
        &self,
        kind: SubResourceKind,
        participant_id: &str,
        known_id: Option<&str>,
    ) -> Lookup {
        match self.probe(kind, participant_id, known_id).await {
            Some(id) => Lookup::Found(id),
            None => Lookup::Absent,
        }
    }

    async fn exists_as_invitee(
        &self,
        participant_id: &str,
        known_invitee_id: Option<&str>,
    ) -> Option<String> {
        self.probe(SubResourceKind::Invitee, participant_id, known_invitee_id)
            .await
    }

    async fn exists_as_attendee(
        &self,
        participant_id: &str,
        known_attendee_id: Option<&str>,
    ) -> Option<String> {
        self.probe(SubResourceKind::Attendee, participant_id, known_attendee_id)
            .await
    }
}

/// [`ExistenceProber`] backed by an [`IdMapper`].
pub struct IdMapperProber {
    mapper: Arc<dyn IdMapper>,
}

impl IdMapperProber {
    pub fn new(mapper: Arc<dyn IdMapper>) -> Self {
        Self { mapper }
    }
}

#[async_trait]
impl ExistenceProber for IdMapperProber {
    async fn probe(
        &self,
        kind: SubResourceKind,
        participant_id: &str,
        known_id: Option<&str>,
    ) -> Option<String> {
        self.lookup(kind, participant_id, known_id).await.into_id()
    }

    async fn lookup(
        &self,
        kind: SubResourceKind,
        participant_id: &str,
        known_id: Option<&str>,
    ) -> Lookup {
        if let Some(known) = known_id.filter(|id| !id.is_empty()) {
            return match self.mapper.participant_id(kind, known).await {
                Ok(Some(owner)) if owner == participant_id => Lookup::Found(known.to_string()),
                Ok(Some(owner)) => {
                    debug!(
                        kind = %kind,
                        participant_id = %participant_id,
                        known_id = %known,
                        owner = %owner,
                        "Known sub-resource id belongs to another participant"
                    );
                    Lookup::Absent
                }
                Ok(None) => {
                    debug!(
                        kind = %kind,
                        participant_id = %participant_id,
                        known_id = %known,
                        "Known sub-resource id has no mapping"
                    );
                    Lookup::Absent
                }
                Err(e) => {
                    debug!(
                        kind = %kind,
                        participant_id = %participant_id,
                        known_id = %known,
                        mapper = self.mapper.name(),
                        error = %e,
                        "Reverse lookup failed, assuming absent"
                    );
                    Lookup::Unknown
                }
            };
        }

        match self.mapper.sub_resource_id(kind, participant_id).await {
            Ok(Some(id)) if !id.is_empty() => Lookup::Found(id),
            Ok(_) => {
                debug!(kind = %kind, participant_id = %participant_id, "No sub-resource mapping");
                Lookup::Absent
            }
            Err(e) => {
                debug!(
                    kind = %kind,
                    participant_id = %participant_id,
                    mapper = self.mapper.name(),
                    error = %e,
                    "Forward lookup failed, assuming absent"
                );
                Lookup::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_idmap::{IdMapError, IdMapResult, IdNamespace};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticMapper {
        entries: HashMap<(IdNamespace, String), String>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StaticMapper {
        fn new(entries: &[(IdNamespace, &str, &str)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(ns, from, to)| ((*ns, from.to_string()), to.to_string()))
                    .collect(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(&[])
            }
        }
    }

    #[async_trait]
    impl IdMapper for StaticMapper {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn resolve(
            &self,
            namespace: IdNamespace,
            source_id: &str,
        ) -> IdMapResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(IdMapError::Timeout {
                    subject: namespace.to_string(),
                    timeout_ms: 3000,
                });
            }
            Ok(self.entries.get(&(namespace, source_id.to_string())).cloned())
        }
    }

    #[tokio::test]
    async fn test_forward_mapping_means_exists() {
        let prober = IdMapperProber::new(Arc::new(StaticMapper::new(&[(
            IdNamespace::ParticipantToInvitee,
            "p-1",
            "inv-1",
        )])));

        assert_eq!(
            prober.exists_as_invitee("p-1", None).await.as_deref(),
            Some("inv-1")
        );
        assert_eq!(prober.exists_as_attendee("p-1", None).await, None);
    }

    #[tokio::test]
    async fn test_known_id_uses_reverse_lookup() {
        let mapper = Arc::new(StaticMapper::new(&[(
            IdNamespace::AttendeeToParticipant,
            "att-9",
            "p-1",
        )]));
        let prober = IdMapperProber::new(mapper.clone());

        // No forward mapping exists, the known id alone decides.
        assert_eq!(
            prober.exists_as_attendee("p-1", Some("att-9")).await.as_deref(),
            Some("att-9")
        );
        assert_eq!(prober.exists_as_attendee("p-1", Some("att-0")).await, None);
        assert_eq!(mapper.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_known_id_of_other_participant_is_absent() {
        let prober = IdMapperProber::new(Arc::new(StaticMapper::new(&[
            (IdNamespace::InviteeToParticipant, "inv-1", "p-1"),
            (IdNamespace::ParticipantToInvitee, "p-2", "inv-2"),
        ])));

        assert_eq!(prober.exists_as_invitee("p-2", Some("inv-1")).await, None);
        assert_eq!(
            prober.exists_as_invitee("p-1", Some("inv-1")).await.as_deref(),
            Some("inv-1")
        );
    }

    #[tokio::test]
    async fn test_empty_known_id_falls_back_to_forward() {
        let prober = IdMapperProber::new(Arc::new(StaticMapper::new(&[(
            IdNamespace::ParticipantToInvitee,
            "p-1",
            "inv-1",
        )])));

        assert_eq!(
            prober.exists_as_invitee("p-1", Some("")).await.as_deref(),
            Some("inv-1")
        );
    }

    #[tokio::test]
    async fn test_lookup_errors_read_as_absent() {
        let prober = IdMapperProber::new(Arc::new(StaticMapper::failing()));

        assert_eq!(prober.exists_as_invitee("p-1", None).await, None);
        assert_eq!(prober.exists_as_attendee("p-1", Some("att-1")).await, None);
    }

    #[tokio::test]
    async fn test_lookup_tells_failures_from_missing_mappings() {
        let failing = IdMapperProber::new(Arc::new(StaticMapper::failing()));
        assert_eq!(
            failing.lookup(SubResourceKind::Invitee, "p-1", None).await,
            Lookup::Unknown
        );
        assert_eq!(
            failing
                .lookup(SubResourceKind::Attendee, "p-1", Some("att-1"))
                .await,
            Lookup::Unknown
        );

        let empty = IdMapperProber::new(Arc::new(StaticMapper::new(&[])));
        assert_eq!(
            empty.lookup(SubResourceKind::Invitee, "p-1", None).await,
            Lookup::Absent
        );
    }
}
