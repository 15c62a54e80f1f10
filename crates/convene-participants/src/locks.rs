//! Per-participant serialization.
//!
//! Existence is re-probed on every request, so two requests for the same
//! participant would otherwise interleave their probe-then-act sequences.
//! Requests for different participants never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Hands out one async lock per participant key.
#[derive(Debug, Clone, Default)]
pub struct ParticipantLocks {
    entries: Arc<Mutex<LockMap>>,
}

impl ParticipantLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    ///
    /// Cancelling the returned future while it waits leaves no entry behind.
    pub async fn lock(&self, key: &str) -> ParticipantGuard {
        let entry = {
            let mut entries = self.entries();
            entries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        // Dropped after the pending lock future if this call is cancelled.
        let waiter = Waiter { key, locks: self };
        let guard = entry.lock_owned().await;
        drop(waiter);

        ParticipantGuard {
            key: key.to_string(),
            locks: self.clone(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or waited on.
    #[must_use]
    pub fn active(&self) -> usize {
        self.entries().len()
    }

    fn entries(&self) -> MutexGuard<'_, LockMap> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, key: &str) {
        let mut entries = self.entries();
        // Only the map itself still references the lock: nobody holds or waits.
        if entries
            .get(key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            entries.remove(key);
        }
    }
}

/// Releases the map entry if a `lock()` call is dropped mid-wait.
struct Waiter<'a> {
    key: &'a str,
    locks: &'a ParticipantLocks,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        self.locks.release(self.key);
    }
}

/// Exclusive access to one participant until dropped.
#[derive(Debug)]
pub struct ParticipantGuard {
    key: String,
    locks: ParticipantLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl ParticipantGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for ParticipantGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(&self.key);
    }
}
