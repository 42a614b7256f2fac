// ────────────────────────────────────────────────────────────────────────────
// Persistence capabilities consumed by the orchestrator and the HTTP layer.
//
//   history          tailored resume snapshots (PostgreSQL)
//   applications     job-application tracker (PostgreSQL)
//   artifact_cache   cover letters / match reports keyed by their inputs (Redis)
//   archive          exported documents (S3 / MinIO)

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, JobApplication, NewApplication};
use crate::models::history::HistoryEntry;
use crate::models::resume::ResumeData;

pub mod applications;
pub mod archive;
pub mod artifact_cache;
pub mod history;

pub use applications::PgApplicationStore;
pub use archive::S3DocumentArchive;
pub use artifact_cache::RedisArtifactCache;
pub use history::PgHistoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored row: {0}")]
    InvalidRow(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn persist(&self, data: &ResumeData) -> Result<HistoryEntry, StorageError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError>;

    async fn get(&self, id: Uuid) -> Result<Option<HistoryEntry>, StorageError>;

    /// Returns `false` when no entry with that id existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Deletes every entry and returns how many there were.
    async fn clear(&self) -> Result<u64, StorageError>;
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn create(&self, application: &NewApplication) -> Result<JobApplication, StorageError>;

    /// Most recently applied first.
    async fn list(&self) -> Result<Vec<JobApplication>, StorageError>;

    /// `None` when no application with that id exists.
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, StorageError>;

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;

    async fn clear(&self) -> Result<u64, StorageError>;
}

/// Provider text for a derived artifact, keyed by the exact inputs that produced it.
#[async_trait]
pub trait ArtifactCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn put(&self, key: &str, text: &str) -> Result<(), StorageError>;
}

#[async_trait]
pub trait DocumentArchive: Send + Sync {
    async fn store(&self, key: &str, html: String) -> Result<(), StorageError>;
}
