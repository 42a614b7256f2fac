use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::history::{HistoryEntry, HistoryRow};
use crate::models::resume::ResumeData;
use crate::storage::{HistoryStore, StorageError};

/// `resume_history` table access. The schema is created by `db::ensure_schema`.
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn persist(&self, data: &ResumeData) -> Result<HistoryEntry, StorageError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, HistoryRow>(
            r#"
            INSERT INTO resume_history (id, resume_data, created_at)
            VALUES ($1, $2, NOW())
            RETURNING id, resume_data, created_at
            "#,
        )
        .bind(id)
        .bind(serde_json::to_value(data)?)
        .fetch_one(&self.pool)
        .await?;

        info!("Saved resume history entry {id}");
        Ok(HistoryEntry::try_from(row)?)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, resume_data, created_at FROM resume_history ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| HistoryEntry::try_from(row).map_err(StorageError::from))
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<HistoryEntry>, StorageError> {
        let row = sqlx::query_as::<_, HistoryRow>(
            "SELECT id, resume_data, created_at FROM resume_history WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(HistoryEntry::try_from).transpose()?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM resume_history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM resume_history")
            .execute(&self.pool)
            .await?;
        info!("Cleared {} resume history entries", result.rows_affected());
        Ok(result.rows_affected())
    }
}
