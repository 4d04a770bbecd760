#![forbid(unsafe_code)]

pub mod error;
pub mod heartbeat;
pub mod remote;
pub mod sessions;

pub use exam_core::Clock;

pub use error::RemoteError;
pub use heartbeat::{
    AttemptCallback, HEARTBEAT_INTERVAL, HeartbeatHandle, HeartbeatService, SnapshotSource,
};
pub use remote::{ExamApi, ExamApiConfig, HeartbeatRequest, HttpExamApi};
pub use sessions::{CancelGuard, SessionLoader, SessionRuntime, demo_session_id, demo_snapshot};
