use async_trait::async_trait;
use redis::Client as RedisClient;
use uuid::Uuid;

use crate::models::resume::ResumeData;
use crate::storage::{ArtifactCache, StorageError};

pub const DEFAULT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Cache key for a derived artifact: `artifact:{kind}:{uuid-v5 of the inputs}`.
///
/// Serialization of `ResumeData` is field-ordered, so equal resumes hash equally.
pub fn artifact_key(kind: &str, data: &ResumeData, job_description: &str) -> String {
    let mut material = serde_json::to_vec(data).unwrap_or_default();
    material.push(0);
    material.extend_from_slice(job_description.as_bytes());
    let digest = Uuid::new_v5(&Uuid::NAMESPACE_OID, &material);
    format!("artifact:{kind}:{digest}")
}

#[derive(Clone)]
pub struct RedisArtifactCache {
    client: RedisClient,
    ttl_secs: u64,
}

impl RedisArtifactCache {
    pub fn new(client: RedisClient, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl ArtifactCache for RedisArtifactCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, text: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(key)
            .arg(text)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
