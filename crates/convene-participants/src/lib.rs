//! # Participant Reconciliation
//!
//! A past-meeting participant is one logical entity stored as up to two
//! unrelated remote records: an invitee ("was invited") and an attendee
//! ("attended"). This crate keeps the two in line with what callers ask for
//! and presents them as a single [`MergedParticipant`].
//!
//! ## Overview
//!
//! - [`ExistenceProber`] infers which records exist through the identifier bridge
//! - [`SideAction::decide`] picks create/update/delete/noop per side
//! - [`ParticipantReconciler`] runs both sides concurrently and merges the results
//! - [`merge_participant`] applies the field precedence rules
//!
//! ## Usage
//!
//! ```ignore
//! use convene_participants::{CreateParticipantRequest, ParticipantReconciler};
//!
//! let reconciler = ParticipantReconciler::new(proxy.clone(), proxy, mapper);
//! let participant = reconciler
//!     .create_participant(&past_meeting_id, CreateParticipantRequest {
//!         is_invited: true,
//!         invitee: Some(invitee),
//!         ..Default::default()
//!     })
//!     .await?;
//! ```

pub mod error;
pub mod locks;
pub mod merge;
pub mod plan;
pub mod prober;
pub mod reconciler;
pub mod types;

pub use error::{ReconcileError, ReconcileResult};
pub use locks::{ParticipantGuard, ParticipantLocks};
pub use merge::{merge_participant, SideState};
pub use plan::SideAction;
pub use prober::{ExistenceProber, IdMapperProber, Lookup};
pub use reconciler::ParticipantReconciler;
pub use types::{CreateParticipantRequest, MergedParticipant, UpdateParticipantRequest};
