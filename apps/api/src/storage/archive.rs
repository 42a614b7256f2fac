use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::info;

use crate::storage::{DocumentArchive, StorageError};

/// Key under which an exported document is stored.
pub fn export_key(session_id: uuid::Uuid, export_id: uuid::Uuid) -> String {
    format!("exports/{session_id}/{export_id}.html")
}

#[derive(Clone)]
pub struct S3DocumentArchive {
    s3: S3Client,
    bucket: String,
}

impl S3DocumentArchive {
    pub fn new(s3: S3Client, bucket: String) -> Self {
        Self { s3, bucket }
    }
}

#[async_trait]
impl DocumentArchive for S3DocumentArchive {
    async fn store(&self, key: &str, html: String) -> Result<(), StorageError> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(html.into_bytes()))
            .content_type("text/html; charset=utf-8")
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("S3 upload failed: {e}")))?;

        info!("Uploaded exported document to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_export_key_layout() {
        let session = Uuid::nil();
        let export = Uuid::from_u128(1);
        assert_eq!(
            export_key(session, export),
            format!("exports/{session}/{export}.html")
        );
    }
}
