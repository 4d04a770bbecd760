use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use exam_core::model::{SessionId, SessionSnapshot};

use crate::repository::{SnapshotRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<SessionSnapshot>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT snapshot
            FROM session_snapshots
            WHERE session_id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("snapshot")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let snapshot: SessionSnapshot = serde_json::from_str(&raw)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(snapshot)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO session_snapshots (session_id, snapshot, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(session_id) DO UPDATE SET
                snapshot = excluded.snapshot,
                saved_at = excluded.saved_at
            ",
        )
        .bind(snapshot.session_id.as_str())
        .bind(raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
