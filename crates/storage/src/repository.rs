use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use exam_core::model::{SessionId, SessionSnapshot};

/// Errors surfaced by snapshot storage adapters.
///
/// Callers treat all of these as recoverable: a failed load is "no stored
/// value" and a failed save is silently dropped; persistence is best-effort
/// and never blocks the session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for session snapshots.
///
/// One record per session id, the value being the full serialized snapshot.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Fetch the stored snapshot for a session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read or the stored
    /// value no longer deserializes.
    async fn load(&self, id: &SessionId) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Persist or replace the snapshot for its session id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshots: Arc<Mutex<HashMap<SessionId, SessionSnapshot>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionSnapshot>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(snapshot.session_id.clone(), snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Item, ItemId, Modality, Section, SectionId};
    use exam_core::time::fixed_now;

    fn build_snapshot(id: &str) -> SessionSnapshot {
        let section = Section::new(
            SectionId::new("sec-1"),
            "Quant",
            vec![Item::new(ItemId::new("q1"), "Q", Modality::Quant)],
        );
        SessionSnapshot::new(SessionId::new(id), vec![section], fixed_now())
    }

    #[tokio::test]
    async fn load_returns_none_for_unknown_session() {
        let repo = InMemoryRepository::new();
        let loaded = repo.load(&SessionId::new("missing")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = InMemoryRepository::new();
        let snapshot = build_snapshot("s-1");
        repo.save(&snapshot).await.unwrap();

        let loaded = repo.load(&SessionId::new("s-1")).await.unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn save_overwrites_prior_snapshot() {
        let repo = InMemoryRepository::new();
        let mut snapshot = build_snapshot("s-1");
        repo.save(&snapshot).await.unwrap();

        snapshot.draft_answer = "updated".into();
        repo.save(&snapshot).await.unwrap();

        let loaded = repo.load(&SessionId::new("s-1")).await.unwrap().unwrap();
        assert_eq!(loaded.draft_answer, "updated");
    }
}
