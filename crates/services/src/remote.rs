//! Remote exam service client.
//!
//! The server is a black box with two endpoints: session lookup for
//! hydration and a heartbeat sink. Both are consumed fire-and-forget; the
//! caller decides what to do with failures (in practice: nothing).

use std::env;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use exam_core::model::{SessionId, SessionSnapshot};

use crate::error::RemoteError;

/// Heartbeat payload: the full snapshot plus identity and a client timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    pub session_id: SessionId,
    pub exam_package_id: Option<String>,
    pub ts: DateTime<Utc>,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    #[serde(default)]
    snapshot: Option<SessionSnapshot>,
}

/// Port for the remote exam service, so session effects are testable with fakes.
#[async_trait]
pub trait ExamApi: Send + Sync {
    /// Fetch the server's canonical snapshot for a session, if it has one.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` for transport failures or non-success statuses.
    async fn fetch_session(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionSnapshot>, RemoteError>;

    /// Push one heartbeat. The response body is unused.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` for transport failures or non-success statuses.
    async fn send_heartbeat(&self, beat: &HeartbeatRequest) -> Result<(), RemoteError>;
}

#[derive(Clone, Debug)]
pub struct ExamApiConfig {
    pub base_url: String,
}

impl ExamApiConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("EXAM_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self { base_url })
    }
}

/// HTTP implementation of [`ExamApi`].
///
/// No timeout is applied beyond the transport default.
#[derive(Clone)]
pub struct HttpExamApi {
    client: Client,
    config: ExamApiConfig,
}

impl HttpExamApi {
    #[must_use]
    pub fn new(config: ExamApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn session_url(&self, id: &SessionId) -> String {
        format!(
            "{}/sessions/{}",
            self.config.base_url.trim_end_matches('/'),
            id
        )
    }
}

#[async_trait]
impl ExamApi for HttpExamApi {
    async fn fetch_session(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionSnapshot>, RemoteError> {
        let response = self.client.get(self.session_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RemoteError::HttpStatus(response.status()));
        }

        let envelope: SessionEnvelope = response.json().await?;
        Ok(envelope.snapshot)
    }

    async fn send_heartbeat(&self, beat: &HeartbeatRequest) -> Result<(), RemoteError> {
        let url = format!("{}/heartbeat", self.session_url(&beat.session_id));
        let response = self.client.post(url).json(beat).send().await?;

        if !response.status().is_success() {
            return Err(RemoteError::HttpStatus(response.status()));
        }
        Ok(())
    }
}
