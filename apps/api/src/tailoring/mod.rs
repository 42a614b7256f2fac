//! Tailoring: the AI capability consumed by the orchestrator.
//!
//! The orchestrator only knows `TailoringProvider`; `provider::LlmTailoringProvider`
//! is the production implementation backed by `llm_client`.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::resume::ResumeData;

pub mod prompts;
pub mod provider;

pub use provider::LlmTailoringProvider;

#[derive(Debug, Error)]
pub enum TailorError {
    /// Provider unreachable, quota exhausted, or an API-level rejection.
    #[error("AI request failed: {0}")]
    Provider(String),

    /// The provider answered, but not with a usable resume record.
    #[error("AI returned an unusable result: {0}")]
    Schema(String),
}

/// An image that may contain a job description.
#[derive(Debug, Clone)]
pub struct ImageDocument {
    pub media_type: String,
    pub bytes: Bytes,
}

#[async_trait]
pub trait TailoringProvider: Send + Sync {
    /// Rewrites the resume against the job description.
    async fn tailor_resume(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeData, TailorError>;

    /// OCR for screenshotted job descriptions. `None` when nothing readable was found.
    async fn extract_text_from_image(&self, image: &ImageDocument) -> Option<String>;

    async fn generate_cover_letter(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Option<String>;

    /// Free-text match/ATS report. The format is whatever the provider returns.
    async fn evaluate_resume(&self, resume: &ResumeData, job_description: &str)
        -> Option<String>;
}

/// Parses a tailoring response: strips markdown fences, deserializes leniently
/// (unknown fields ignored, missing fields defaulted) and validates.
pub fn parse_resume_response(raw: &str) -> Result<ResumeData, TailorError> {
    let json = strip_json_fences(raw);
    if json.is_empty() {
        return Err(TailorError::Schema("empty response".to_string()));
    }
    let data: ResumeData =
        serde_json::from_str(json).map_err(|e| TailorError::Schema(e.to_string()))?;
    if data.name.trim().is_empty() {
        return Err(TailorError::Schema("resume has no name".to_string()));
    }
    Ok(data)
}

/// Returns at most `max_chars` Unicode scalar values of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
