use std::sync::Arc;

use exam_core::model::{SessionSnapshot, SessionId};
use exam_core::time::epoch_ms;
use exam_core::{Action, Clock, apply};
use storage::repository::SnapshotRepository;

/// Owns one session's snapshot and applies actions to it.
///
/// Every dispatch runs the pure state machine, stamps a fresh persistence
/// timestamp, and writes the result to local storage best-effort: a failed
/// write is logged and dropped, never surfaced, so the session keeps
/// working offline.
pub struct SessionRuntime {
    snapshot: SessionSnapshot,
    clock: Clock,
    store: Arc<dyn SnapshotRepository>,
}

impl SessionRuntime {
    #[must_use]
    pub fn new(snapshot: SessionSnapshot, clock: Clock, store: Arc<dyn SnapshotRepository>) -> Self {
        Self {
            snapshot,
            clock,
            store,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.snapshot.session_id
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Apply an action and persist the resulting snapshot.
    pub async fn dispatch(&mut self, action: &Action) -> &SessionSnapshot {
        let now = self.clock.now();
        let mut next = apply(&self.snapshot, action, now);
        next.saved_at_ms = epoch_ms(now);

        if let Err(err) = self.store.save(&next).await {
            tracing::warn!(
                session = %next.session_id,
                error = %err,
                "dropping failed snapshot write"
            );
        }

        self.snapshot = next;
        &self.snapshot
    }

    /// Replace local state with a server snapshot when its id matches.
    ///
    /// The engine itself hydrates unconditionally; the id check lives here,
    /// before dispatch, per the service contract. Returns whether the
    /// snapshot was accepted.
    pub async fn hydrate_if_matching(&mut self, server: SessionSnapshot) -> bool {
        if server.session_id != self.snapshot.session_id {
            tracing::debug!(
                local = %self.snapshot.session_id,
                server = %server.session_id,
                "ignoring server snapshot for a different session"
            );
            return false;
        }
        self.dispatch(&Action::HydrateFromSnapshot { snapshot: server })
            .await;
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
