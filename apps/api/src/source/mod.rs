// Source documents: the uploaded resume and how its text is pulled out.
// The orchestrator only sees the `SourceExtractor` trait; `pdf` holds the
// production implementation and `normalizer` the post-extraction cleanup.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod normalizer;
pub mod pdf;

pub use normalizer::normalize;
pub use pdf::DocumentTextExtractor;

/// An opaque uploaded document, as received from the client.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported document type: {0}")]
    Unsupported(String),

    #[error("PDF could not be read: {0}")]
    Pdf(String),

    #[error("document contains no text")]
    Empty,
}

/// Turns a source document into raw text.
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    async fn extract_text(&self, document: &SourceDocument) -> Result<String, ExtractionError>;
}
