use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use exam_core::Clock;
use exam_core::model::SessionId;
use storage::repository::SnapshotRepository;

use crate::remote::ExamApi;
use crate::sessions::runtime::SessionRuntime;
use crate::sessions::seed::demo_snapshot;

/// Cancellation flag for an in-flight hydration fetch.
///
/// The owning view sets it on unmount so a late-arriving server response no
/// longer mutates state.
#[derive(Clone, Default)]
pub struct CancelGuard {
    cancelled: Arc<AtomicBool>,
}

impl CancelGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Builds a runtime at session mount and reconciles it with the server.
///
/// Load order is: local snapshot if present, else a fresh demo seed; then an
/// independent hydration fetch that replaces state wholesale when the server
/// answers with a matching snapshot. When both the local write and the
/// server fetch resolve, last-applied wins: there is deliberately no merge,
/// which is a known consistency gap of this design rather than a bug.
pub struct SessionLoader {
    store: Arc<dyn SnapshotRepository>,
    api: Arc<dyn ExamApi>,
    clock: Clock,
}

impl SessionLoader {
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotRepository>, api: Arc<dyn ExamApi>, clock: Clock) -> Self {
        Self { store, api, clock }
    }

    /// Load the locally stored snapshot or seed a demo session.
    ///
    /// Storage failures are treated as "nothing stored": the session always
    /// starts.
    pub async fn load_or_seed(&self, session_id: &SessionId) -> SessionRuntime {
        let snapshot = match self.store.load(session_id).await {
            Ok(Some(stored)) => stored,
            Ok(None) => demo_snapshot(session_id.clone(), self.clock.now()),
            Err(err) => {
                tracing::warn!(
                    session = %session_id,
                    error = %err,
                    "treating unreadable local snapshot as absent"
                );
                demo_snapshot(session_id.clone(), self.clock.now())
            }
        };
        SessionRuntime::new(snapshot, self.clock, Arc::clone(&self.store))
    }

    /// One-shot server hydration for an already-running session.
    ///
    /// Every failure path (transport error, missing session, id mismatch,
    /// cancellation) keeps local state and returns `false`.
    pub async fn hydrate(&self, runtime: &mut SessionRuntime, cancel: &CancelGuard) -> bool {
        let session_id = runtime.session_id().clone();
        match self.api.fetch_session(&session_id).await {
            Ok(Some(server)) => {
                if cancel.is_cancelled() {
                    tracing::debug!(session = %session_id, "hydration cancelled, dropping server snapshot");
                    return false;
                }
                runtime.hydrate_if_matching(server).await
            }
            Ok(None) => false,
            Err(err) => {
                tracing::debug!(
                    session = %session_id,
                    error = %err,
                    "keeping local state after failed hydration fetch"
                );
                false
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
