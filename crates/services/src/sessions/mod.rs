mod loader;
mod runtime;
mod seed;

// Public API of the session subsystem.
pub use loader::{CancelGuard, SessionLoader};
pub use runtime::SessionRuntime;
pub use seed::{demo_session_id, demo_snapshot};
