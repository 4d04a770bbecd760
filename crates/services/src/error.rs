//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by the remote exam API client.
///
/// The session core swallows all of these: a failed hydration keeps local
/// state and a failed heartbeat waits for the next tick.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("exam API request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
