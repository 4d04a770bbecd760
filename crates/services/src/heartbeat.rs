//! Periodic snapshot push keeping the server able to recover the session.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use exam_core::Clock;
use exam_core::model::SessionSnapshot;
use tokio::task::JoinHandle;

use crate::remote::{ExamApi, HeartbeatRequest};

/// Fixed delay between heartbeat attempts.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

/// Provides the current snapshot at each tick.
pub type SnapshotSource = Arc<dyn Fn() -> SessionSnapshot + Send + Sync>;

/// Invoked immediately before each attempt, independent of its outcome.
///
/// Hosts typically dispatch `Action::MarkHeartbeatAttempt` and refresh any
/// "last attempt" display from here.
pub type AttemptCallback = Arc<dyn Fn(DateTime<Utc>) + Send + Sync>;

/// Pushes the full session snapshot to the server on a fixed interval.
///
/// The first beat fires immediately on activation. Failures are swallowed
/// without retry or backoff; the next scheduled tick is the retry
/// mechanism.
#[derive(Clone)]
pub struct HeartbeatService {
    api: Arc<dyn ExamApi>,
    clock: Clock,
}

impl HeartbeatService {
    #[must_use]
    pub fn new(api: Arc<dyn ExamApi>, clock: Clock) -> Self {
        Self { api, clock }
    }

    /// One heartbeat attempt: notify the callback, then push the snapshot.
    pub async fn beat_once(&self, source: &SnapshotSource, on_attempt: &AttemptCallback) {
        let snapshot = source();
        let now = self.clock.now();
        on_attempt(now);

        let beat = HeartbeatRequest {
            session_id: snapshot.session_id.clone(),
            exam_package_id: snapshot.exam_package_id.clone(),
            ts: now,
            snapshot,
        };
        if let Err(err) = self.api.send_heartbeat(&beat).await {
            tracing::debug!(
                session = %beat.session_id,
                error = %err,
                "heartbeat attempt failed, waiting for next tick"
            );
        }
    }

    /// Start the heartbeat loop; the returned handle stops it.
    #[must_use]
    pub fn spawn(self, source: SnapshotSource, on_attempt: AttemptCallback) -> HeartbeatHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
            loop {
                ticker.tick().await;
                self.beat_once(&source, &on_attempt).await;
            }
        });
        HeartbeatHandle { task }
    }
}

/// Owner handle for a running heartbeat loop.
///
/// Dropping the handle stops the loop, mirroring a view unmount.
pub struct HeartbeatHandle {
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    pub fn stop(&self) {
        self.task.abort();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
