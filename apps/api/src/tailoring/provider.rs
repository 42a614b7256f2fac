use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::prompts::{FACTUAL_INTEGRITY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{ImageInput, LlmClient};
use crate::models::resume::ResumeData;
use crate::tailoring::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, IMAGE_EXTRACTION_PROMPT, MATCH_REPORT_PROMPT_TEMPLATE,
    NO_TEXT_FOUND, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM_TEMPLATE, TEXT_SYSTEM,
};
use crate::tailoring::{
    parse_resume_response, truncate_chars, ImageDocument, TailorError, TailoringProvider,
};

/// Derived-artifact prompts only see the head of the job description.
const ARTIFACT_JD_CHARS: usize = 2_000;

/// Production `TailoringProvider` backed by the shared `LlmClient`.
#[derive(Clone)]
pub struct LlmTailoringProvider {
    llm: LlmClient,
}

impl LlmTailoringProvider {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TailoringProvider for LlmTailoringProvider {
    async fn tailor_resume(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeData, TailorError> {
        let system = tailor_system_prompt();
        let prompt = TAILOR_PROMPT_TEMPLATE
            .replace("{job_description}", job_description)
            .replace("{resume_text}", resume_text);

        let raw = self
            .llm
            .call_text(&prompt, &system)
            .await
            .map_err(|e| TailorError::Provider(e.to_string()))?;

        let data = parse_resume_response(&raw)?;
        info!(
            "Tailored resume: {} roles, {} projects, {} skill lines",
            data.experience.len(),
            data.projects.len(),
            data.skills.len()
        );
        Ok(data)
    }

    async fn extract_text_from_image(&self, image: &ImageDocument) -> Option<String> {
        let input = ImageInput {
            media_type: &image.media_type,
            bytes: &image.bytes,
        };
        match self
            .llm
            .call_with_image(IMAGE_EXTRACTION_PROMPT, TEXT_SYSTEM, input)
            .await
        {
            Ok(response) => response.text().and_then(readable_image_text),
            Err(e) => {
                warn!("Image text extraction failed: {e}");
                None
            }
        }
    }

    async fn generate_cover_letter(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Option<String> {
        let prompt = COVER_LETTER_PROMPT_TEMPLATE
            .replace("{job_description}", truncate_chars(job_description, ARTIFACT_JD_CHARS))
            .replace("{name}", &resume.name)
            .replace("{summary}", &resume.summary)
            .replace("{skills}", &resume.skills.join(", "));

        self.llm
            .call_text(&prompt, TEXT_SYSTEM)
            .await
            .map_err(|e| warn!("Cover letter generation failed: {e}"))
            .ok()
    }

    async fn evaluate_resume(
        &self,
        resume: &ResumeData,
        job_description: &str,
    ) -> Option<String> {
        let prompt = MATCH_REPORT_PROMPT_TEMPLATE
            .replace("{job_description}", truncate_chars(job_description, ARTIFACT_JD_CHARS))
            .replace("{summary}", &resume.summary)
            .replace("{skills}", &resume.skills.join(", "));

        self.llm
            .call_text(&prompt, TEXT_SYSTEM)
            .await
            .map_err(|e| warn!("Match report generation failed: {e}"))
            .ok()
    }
}

fn tailor_system_prompt() -> String {
    TAILOR_SYSTEM_TEMPLATE
        .replace("{factual_integrity}", FACTUAL_INTEGRITY_INSTRUCTION)
        .replace("{json_only}", JSON_ONLY_SYSTEM)
}

/// `None` for blank replies and the model's "No text found" sentinel.
fn readable_image_text(reply: &str) -> Option<String> {
    let text = reply.trim();
    let sentinel = text.trim_end_matches('.');
    if text.is_empty() || sentinel.eq_ignore_ascii_case(NO_TEXT_FOUND) {
        None
    } else {
        Some(text.to_string())
    }
}
