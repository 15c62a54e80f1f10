//! Shared fakes for reconciler tests.
//!
//! The fakes keep real state (a mapping table and two document stores) so
//! that existence probes observe the effect of earlier calls.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use convene_core::{PastMeetingId, SubResourceKind};
use convene_idmap::{IdMapError, IdMapResult, IdMapper, IdNamespace};
use convene_participants::ParticipantReconciler;
use convene_proxy::{
    Attendee, AttendeeClient, AttendeeSession, CreateAttendeeRequest, CreateInviteeRequest,
    Invitee, InviteeClient, ProxyError, ProxyResult, UpdateAttendeeRequest, UpdateInviteeRequest,
};

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

pub fn past_meeting() -> PastMeetingId {
    PastMeetingId::from_parts("1234567890", "1692164906").unwrap()
}

fn unavailable() -> ProxyError {
    ProxyError::Unavailable {
        status: 503,
        message: "proxy unavailable".to_string(),
    }
}

// =============================================================================
// Identifier mapping fake
// =============================================================================

/// In-memory mapping table.
///
/// Sub-resources created through the fake clients are linked to the
/// participant id set with [`FakeIdMapper::assign_new_to`].
pub struct FakeIdMapper {
    entries: Mutex<HashMap<(IdNamespace, String), String>>,
    assign_new_to: Mutex<Option<String>>,
    fail: AtomicBool,
    call_count: AtomicUsize,
}

impl FakeIdMapper {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            assign_new_to: Mutex::new(None),
            fail: AtomicBool::new(false),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn link(&self, kind: SubResourceKind, participant_id: &str, sub_resource_id: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            (IdNamespace::forward(kind), participant_id.to_string()),
            sub_resource_id.to_string(),
        );
        entries.insert(
            (IdNamespace::reverse(kind), sub_resource_id.to_string()),
            participant_id.to_string(),
        );
    }

    pub fn assign_new_to(&self, participant_id: &str) {
        *self.assign_new_to.lock().unwrap() = Some(participant_id.to_string());
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn on_created(&self, kind: SubResourceKind, sub_resource_id: &str) {
        let participant_id = self.assign_new_to.lock().unwrap().clone();
        if let Some(participant_id) = participant_id {
            self.link(kind, &participant_id, sub_resource_id);
        }
    }
}

#[async_trait]
impl IdMapper for FakeIdMapper {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn resolve(
        &self,
        namespace: IdNamespace,
        source_id: &str,
    ) -> IdMapResult<Option<String>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        // Let concurrent requests interleave like a real round trip would.
        tokio::task::yield_now().await;
        if self.fail.load(Ordering::SeqCst) {
            return Err(IdMapError::Timeout {
                subject: format!("idmap.lookup.{namespace}"),
                timeout_ms: 3000,
            });
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(namespace, source_id.to_string()))
            .cloned())
    }
}

// =============================================================================
// Sub-resource client fakes
// =============================================================================

/// Per-operation call counters and failure switches.
#[derive(Default)]
pub struct OpCounters {
    pub create: AtomicUsize,
    pub get: AtomicUsize,
    pub update: AtomicUsize,
    pub delete: AtomicUsize,
    pub fail_create: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl OpCounters {
    pub fn creates(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.get.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.update.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.delete.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.creates() + self.gets() + self.updates() + self.deletes()
    }

    /// (create, update, delete)
    pub fn writes(&self) -> (usize, usize, usize) {
        (self.creates(), self.updates(), self.deletes())
    }

    fn hit(counter: &AtomicUsize, fail: &AtomicBool) -> ProxyResult<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        if fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

pub struct FakeInviteeClient {
    mapper: Arc<FakeIdMapper>,
    store: Mutex<HashMap<String, Invitee>>,
    next_id: AtomicUsize,
    pub ops: OpCounters,
}

impl FakeInviteeClient {
    pub fn new(mapper: Arc<FakeIdMapper>) -> Self {
        Self {
            mapper,
            store: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            ops: OpCounters::default(),
        }
    }

    /// Store an invitee and map it to `participant_id`.
    pub fn seed(&self, participant_id: &str, invitee: Invitee) {
        self.mapper
            .link(SubResourceKind::Invitee, participant_id, &invitee.uuid);
        self.store
            .lock()
            .unwrap()
            .insert(invitee.uuid.clone(), invitee);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.store.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

#[async_trait]
impl InviteeClient for FakeInviteeClient {
    async fn create_invitee(
        &self,
        _past_meeting_id: &PastMeetingId,
        request: &CreateInviteeRequest,
    ) -> ProxyResult<Invitee> {
        OpCounters::hit(&self.ops.create, &self.ops.fail_create)?;
        let id = format!("inv-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let invitee = Invitee {
            uuid: id.clone(),
            first_name: Some(request.first_name.clone()),
            last_name: Some(request.last_name.clone()),
            primary_email: Some(request.primary_email.clone()),
            lf_sso: request.lf_sso.clone(),
            org: request.org.clone(),
            job_title: request.job_title.clone(),
            committee_id: request.committee_id.clone(),
            committee_role: request.committee_role.clone(),
            created_by: Some("fake".to_string()),
            ..Default::default()
        };
        self.store.lock().unwrap().insert(id.clone(), invitee.clone());
        self.mapper.on_created(SubResourceKind::Invitee, &id);
        Ok(invitee)
    }

    async fn get_invitee(
        &self,
        _past_meeting_id: &PastMeetingId,
        invitee_id: &str,
    ) -> ProxyResult<Invitee> {
        OpCounters::hit(&self.ops.get, &self.ops.fail_get)?;
        self.store
            .lock()
            .unwrap()
            .get(invitee_id)
            .cloned()
            .ok_or_else(|| ProxyError::NotFound {
                kind: SubResourceKind::Invitee,
                id: invitee_id.to_string(),
            })
    }

    async fn update_invitee(
        &self,
        _past_meeting_id: &PastMeetingId,
        invitee_id: &str,
        request: &UpdateInviteeRequest,
    ) -> ProxyResult<Invitee> {
        OpCounters::hit(&self.ops.update, &self.ops.fail_update)?;
        let mut store = self.store.lock().unwrap();
        let invitee = store
            .get_mut(invitee_id)
            .ok_or_else(|| ProxyError::NotFound {
                kind: SubResourceKind::Invitee,
                id: invitee_id.to_string(),
            })?;
        if let Some(first_name) = &request.first_name {
            invitee.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &request.last_name {
            invitee.last_name = Some(last_name.clone());
        }
        if let Some(org) = &request.org {
            invitee.org = Some(org.clone());
        }
        if let Some(job_title) = &request.job_title {
            invitee.job_title = Some(job_title.clone());
        }
        invitee.updated_by = Some("fake".to_string());
        Ok(invitee.clone())
    }

    async fn delete_invitee(
        &self,
        _past_meeting_id: &PastMeetingId,
        invitee_id: &str,
    ) -> ProxyResult<()> {
        OpCounters::hit(&self.ops.delete, &self.ops.fail_delete)?;
        self.store
            .lock()
            .unwrap()
            .remove(invitee_id)
            .map(|_| ())
            .ok_or_else(|| ProxyError::NotFound {
                kind: SubResourceKind::Invitee,
                id: invitee_id.to_string(),
            })
    }
}

pub struct FakeAttendeeClient {
    mapper: Arc<FakeIdMapper>,
    store: Mutex<HashMap<String, Attendee>>,
    next_id: AtomicUsize,
    pub ops: OpCounters,
}

impl FakeAttendeeClient {
    pub fn new(mapper: Arc<FakeIdMapper>) -> Self {
        Self {
            mapper,
            store: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            ops: OpCounters::default(),
        }
    }

    /// Store an attendee and map it to `participant_id`.
    pub fn seed(&self, participant_id: &str, attendee: Attendee) {
        self.mapper
            .link(SubResourceKind::Attendee, participant_id, &attendee.id);
        self.store
            .lock()
            .unwrap()
            .insert(attendee.id.clone(), attendee);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.store.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

#[async_trait]
impl AttendeeClient for FakeAttendeeClient {
    async fn create_attendee(
        &self,
        _past_meeting_id: &PastMeetingId,
        request: &CreateAttendeeRequest,
    ) -> ProxyResult<Attendee> {
        OpCounters::hit(&self.ops.create, &self.ops.fail_create)?;
        let id = format!("att-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let attendee = Attendee {
            id: id.clone(),
            name: Some(request.name.clone()),
            email: Some(request.email.clone()),
            org: request.org.clone(),
            is_verified: request.is_verified,
            is_unknown: request.is_unknown,
            average_attendance: Some(100.0),
            sessions: request.sessions.clone(),
            ..Default::default()
        };
        self.store
            .lock()
            .unwrap()
            .insert(id.clone(), attendee.clone());
        self.mapper.on_created(SubResourceKind::Attendee, &id);
        Ok(attendee)
    }

    async fn get_attendee(
        &self,
        _past_meeting_id: &PastMeetingId,
        attendee_id: &str,
    ) -> ProxyResult<Attendee> {
        OpCounters::hit(&self.ops.get, &self.ops.fail_get)?;
        self.store
            .lock()
            .unwrap()
            .get(attendee_id)
            .cloned()
            .ok_or_else(|| ProxyError::NotFound {
                kind: SubResourceKind::Attendee,
                id: attendee_id.to_string(),
            })
    }

    async fn update_attendee(
        &self,
        _past_meeting_id: &PastMeetingId,
        attendee_id: &str,
        request: &UpdateAttendeeRequest,
    ) -> ProxyResult<Attendee> {
        OpCounters::hit(&self.ops.update, &self.ops.fail_update)?;
        let mut store = self.store.lock().unwrap();
        let attendee = store
            .get_mut(attendee_id)
            .ok_or_else(|| ProxyError::NotFound {
                kind: SubResourceKind::Attendee,
                id: attendee_id.to_string(),
            })?;
        if let Some(name) = &request.name {
            attendee.name = Some(name.clone());
        }
        if let Some(is_verified) = request.is_verified {
            attendee.is_verified = is_verified;
        }
        if let Some(sessions) = &request.sessions {
            attendee.sessions = sessions.clone();
        }
        Ok(attendee.clone())
    }

    async fn delete_attendee(
        &self,
        _past_meeting_id: &PastMeetingId,
        attendee_id: &str,
    ) -> ProxyResult<()> {
        OpCounters::hit(&self.ops.delete, &self.ops.fail_delete)?;
        self.store
            .lock()
            .unwrap()
            .remove(attendee_id)
            .map(|_| ())
            .ok_or_else(|| ProxyError::NotFound {
                kind: SubResourceKind::Attendee,
                id: attendee_id.to_string(),
            })
    }
}

// =============================================================================
// Harness & payloads
// =============================================================================

pub struct Harness {
    pub mapper: Arc<FakeIdMapper>,
    pub invitees: Arc<FakeInviteeClient>,
    pub attendees: Arc<FakeAttendeeClient>,
    pub reconciler: ParticipantReconciler,
}

impl Harness {
    pub fn new() -> Self {
        init_test_logging();
        let mapper = Arc::new(FakeIdMapper::new());
        let invitees = Arc::new(FakeInviteeClient::new(mapper.clone()));
        let attendees = Arc::new(FakeAttendeeClient::new(mapper.clone()));
        let reconciler =
            ParticipantReconciler::new(invitees.clone(), attendees.clone(), mapper.clone());

        Self {
            mapper,
            invitees,
            attendees,
            reconciler,
        }
    }

    /// Total proxy calls on both sides.
    pub fn proxy_calls(&self) -> usize {
        self.invitees.ops.total() + self.attendees.ops.total()
    }
}

pub fn ada_invitee() -> CreateInviteeRequest {
    CreateInviteeRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        primary_email: "ada@example.com".to_string(),
        org: Some("Analytical Engines".to_string()),
        ..Default::default()
    }
}

pub fn grace_attendee() -> CreateAttendeeRequest {
    CreateAttendeeRequest {
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        is_verified: true,
        sessions: vec![AttendeeSession {
            uuid: "session-1".to_string(),
            leave_reason: Some("meeting ended".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

pub fn stored_invitee(id: &str) -> Invitee {
    Invitee {
        uuid: id.to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        primary_email: Some("ada@example.com".to_string()),
        created_by: Some("seed".to_string()),
        ..Default::default()
    }
}

pub fn stored_attendee(id: &str) -> Attendee {
    Attendee {
        id: id.to_string(),
        name: Some("Grace Hopper".to_string()),
        email: Some("grace@example.com".to_string()),
        is_verified: true,
        average_attendance: Some(75.0),
        ..Default::default()
    }
}
