//! Generation orchestrator: sequences extraction, tailoring, rendering and the
//! derived artifacts for one session, and decides for every user action whether
//! the AI stage has to run.
//!
//! All mutations go through `GenerationOrchestrator::mutate`, which holds the
//! session lock for the duration of a synchronous closure and publishes a fresh
//! snapshot before releasing it. The lock is never held across an `.await`.
//!
//! Invariant: `rendered_document` is either `None` or exactly
//! `render(last_resume_data, current_style)`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::resume::{FieldPatch, ResumeData};
use crate::render::StyleId;
use crate::source::{normalize, ExtractionError, SourceDocument, SourceExtractor};
use crate::storage::{ArtifactCache, HistoryStore};
use crate::tailoring::{truncate_chars, ImageDocument, TailorError, TailoringProvider};

pub mod artifacts;
pub mod handlers;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use artifacts::ArtifactKind;
pub use registry::SessionRegistry;
pub use session::{DerivedArtifacts, GenerationSession, SessionPhase, SessionSnapshot};

/// Resume text sent to the AI capability is cut to this many characters.
pub const MAX_RESUME_CHARS: usize = 25_000;
/// Job description sent to the AI capability is cut to this many characters.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 10_000;

const HISTORY_LOAD_FAILED: &str = "Failed to load saved resume.";
const IMAGE_UNREADABLE: &str = "Could not read text from image.";

/// External capabilities the orchestrator drives. Swapped for doubles in tests.
#[derive(Clone)]
pub struct Capabilities {
    pub extractor: Arc<dyn SourceExtractor>,
    pub provider: Arc<dyn TailoringProvider>,
    pub history: Arc<dyn HistoryStore>,
    pub cache: Arc<dyn ArtifactCache>,
}

/// How an AI-backed action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiOutcome {
    /// The result was applied to the session.
    Applied,
    /// Preconditions not met; nothing happened.
    Skipped,
    /// Another AI call is already in flight for this session.
    Rejected,
    /// The call failed; the session is in `Error`.
    Failed,
    /// The session was reset while the call was in flight; the result was dropped.
    Discarded,
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("No tailored resume to edit")]
    NoResume,

    #[error("No rendered document")]
    NoDocument,

    #[error("History entry {0} not found")]
    HistoryNotFound(Uuid),
}

#[derive(Clone)]
pub struct GenerationOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    session: Mutex<GenerationSession>,
    snapshots: watch::Sender<SessionSnapshot>,
    caps: Capabilities,
    last_active: Mutex<Instant>,
}

impl GenerationOrchestrator {
    pub fn new(caps: Capabilities, style: StyleId) -> Self {
        let session = GenerationSession::new(style);
        let (snapshots, _) = watch::channel(session.snapshot());
        Self {
            inner: Arc::new(Inner {
                session: Mutex::new(session),
                snapshots,
                caps,
                last_active: Mutex::new(Instant::now()),
            }),
        }
    }

    // ── Read side ───────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn rendered_document(&self) -> Option<String> {
        self.lock().rendered_document.clone()
    }

    // ── Lifetime ────────────────────────────────────────────────────────────

    /// Marks the session as in use.
    pub fn touch(&self) {
        *self
            .inner
            .last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Time since the last request or state change.
    pub fn idle_for(&self) -> Duration {
        self.inner
            .last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    /// Cancels all in-flight work. Called when the session leaves the registry.
    pub fn close(&self) {
        self.mutate(|s| s.cancel.cancel());
    }

    // ── Source ──────────────────────────────────────────────────────────────

    /// Loads a new source document. Resets the session, then extracts and
    /// normalizes its text. Resolves once extraction has settled.
    pub async fn load_source(&self, document: SourceDocument) {
        let (epoch, cancel) = self.mutate(|s| s.reset_for_new_source());
        info!(
            "Loading source document {:?} ({} bytes), epoch {epoch}",
            document.file_name,
            document.bytes.len()
        );

        let extractor = Arc::clone(&self.inner.caps.extractor);
        let this = self.clone();
        let task = tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = extractor.extract_text(&document) => result,
            };
            this.finish_extraction(epoch, result);
        });

        if let Err(e) = task.await {
            error!("Extraction task failed: {e}");
            self.mutate(|s| {
                if s.epoch == epoch {
                    s.fail(format!("Failed to read source document: {e}"));
                }
            });
        }
    }

    fn finish_extraction(&self, epoch: u64, result: Result<String, ExtractionError>) {
        self.mutate(|s| {
            if s.epoch != epoch {
                debug!("Dropping extraction result from epoch {epoch}");
                return;
            }
            match result {
                // Text typed while extraction ran takes precedence.
                Ok(_) if !s.resume_text.is_empty() => {
                    info!("Keeping resume text entered during extraction");
                }
                Ok(raw) => {
                    s.resume_text = normalize(&raw);
                    info!("Extracted {} characters of resume text", s.resume_text.chars().count());
                }
                Err(e) => {
                    warn!("Source extraction failed: {e}");
                    if !s.ai_in_flight {
                        s.fail(format!("Failed to read source document: {e}"));
                    }
                    return;
                }
            }
            if !s.ai_in_flight {
                s.phase = SessionPhase::Idle;
            }
        });
    }

    /// Manual correction of the extracted text.
    pub fn set_resume_text(&self, text: String) {
        self.mutate(|s| s.resume_text = text);
    }

    pub fn set_job_description(&self, text: String) {
        self.mutate(|s| s.job_description = text);
    }

    // ── AI stage ────────────────────────────────────────────────────────────

    /// The "Tailor" action.
    pub async fn tailor(&self) -> AiOutcome {
        let start = self.mutate(|s| {
            if s.resume_text.trim().is_empty() || s.job_description.trim().is_empty() {
                return Err(AiOutcome::Skipped);
            }
            if s.is_busy() {
                return Err(AiOutcome::Rejected);
            }
            s.ai_in_flight = true;
            s.phase = SessionPhase::AwaitingAiResult;
            Ok((
                s.epoch,
                s.cancel.clone(),
                truncate_chars(&s.resume_text, MAX_RESUME_CHARS).to_string(),
                s.job_description.clone(),
            ))
        });
        let (epoch, cancel, resume_text, job_description) = match start {
            Ok(start) => start,
            Err(outcome) => {
                debug!("Tailor action {outcome:?}");
                return outcome;
            }
        };

        let provider = Arc::clone(&self.inner.caps.provider);
        let this = self.clone();
        let task = tokio::spawn(async move {
            let jd = truncate_chars(&job_description, MAX_JOB_DESCRIPTION_CHARS);
            let result = tokio::select! {
                _ = cancel.cancelled() => return AiOutcome::Discarded,
                result = provider.tailor_resume(&resume_text, jd) => result,
            };
            this.finish_tailoring(epoch, job_description, result)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Tailoring task failed: {e}");
                self.mutate(|s| {
                    if s.epoch == epoch {
                        s.ai_in_flight = false;
                        s.fail(TailorError::Provider(e.to_string()).to_string());
                    }
                });
                AiOutcome::Failed
            }
        }
    }

    fn finish_tailoring(
        &self,
        epoch: u64,
        job_description: String,
        result: Result<ResumeData, TailorError>,
    ) -> AiOutcome {
        let applied = self.mutate(|s| {
            if s.epoch != epoch {
                return Err(AiOutcome::Discarded);
            }
            s.ai_in_flight = false;
            match result {
                Ok(data) => {
                    s.install_resume(data.clone());
                    s.phase = SessionPhase::Ready { has_document: true };
                    Ok((data, s.data_revision, s.artifacts_cancel.clone()))
                }
                Err(e) => {
                    warn!("Tailoring failed: {e}");
                    s.fail(e.to_string());
                    Err(AiOutcome::Failed)
                }
            }
        });

        match applied {
            Ok((data, revision, cancel)) => {
                info!("Tailored resume applied for {}", data.name);
                self.spawn_history_write(data.clone());
                self.request_artifacts(data, job_description, revision, cancel);
                AiOutcome::Applied
            }
            Err(outcome) => outcome,
        }
    }

    /// Reads a screenshotted job description. A readable result replaces the
    /// current job description.
    pub async fn extract_job_description_from_image(&self, image: ImageDocument) -> AiOutcome {
        let start = self.mutate(|s| {
            if s.is_busy() {
                return Err(AiOutcome::Rejected);
            }
            s.ai_in_flight = true;
            s.phase = SessionPhase::AwaitingAiResult;
            Ok((s.epoch, s.cancel.clone()))
        });
        let (epoch, cancel) = match start {
            Ok(start) => start,
            Err(outcome) => return outcome,
        };

        let provider = Arc::clone(&self.inner.caps.provider);
        let this = self.clone();
        let task = tokio::spawn(async move {
            let text = tokio::select! {
                _ = cancel.cancelled() => return AiOutcome::Discarded,
                text = provider.extract_text_from_image(&image) => text,
            };
            this.finish_image_extraction(epoch, text)
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Image extraction task failed: {e}");
                self.finish_image_extraction(epoch, None)
            }
        }
    }

    fn finish_image_extraction(&self, epoch: u64, text: Option<String>) -> AiOutcome {
        self.mutate(|s| {
            if s.epoch != epoch {
                return AiOutcome::Discarded;
            }
            s.ai_in_flight = false;
            match text.filter(|t| !t.trim().is_empty()) {
                Some(text) => {
                    s.job_description = text;
                    s.phase = if s.rendered_document.is_some() {
                        SessionPhase::Ready { has_document: true }
                    } else {
                        SessionPhase::Idle
                    };
                    AiOutcome::Applied
                }
                None => {
                    s.fail(IMAGE_UNREADABLE);
                    AiOutcome::Failed
                }
            }
        })
    }

    // ── Local re-renders (never call the AI capability) ─────────────────────

    /// The "Change style" action.
    pub fn change_style(&self, style: StyleId) {
        self.mutate(|s| {
            if s.current_style == style {
                return;
            }
            s.current_style = style;
            if s.last_resume_data.is_some() {
                s.rerender();
                s.settle();
            }
        });
    }

    /// The "Edit fields" action. Derived artifacts are left as they are.
    pub fn edit_fields(&self, patch: FieldPatch) -> Result<(), OrchestratorError> {
        self.mutate(|s| {
            let patched = s
                .last_resume_data
                .as_ref()
                .ok_or(OrchestratorError::NoResume)?
                .with_patch(patch);
            s.last_resume_data = Some(patched);
            s.rerender();
            s.settle();
            Ok(())
        })
    }

    /// The "Load from history" action.
    pub async fn load_history(&self, entry_id: Uuid) -> Result<(), OrchestratorError> {
        let epoch = self.lock().epoch;

        let entry = match self.inner.caps.history.get(entry_id).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return Err(OrchestratorError::HistoryNotFound(entry_id)),
            Err(e) => {
                error!("Failed to load history entry {entry_id}: {e}");
                self.mutate(|s| s.fail(HISTORY_LOAD_FAILED));
                return Ok(());
            }
        };

        let installed = self.mutate(|s| {
            if s.epoch != epoch {
                return None;
            }
            s.install_resume(entry.resume_data.clone());
            s.settle();
            Some((
                s.job_description.clone(),
                s.data_revision,
                s.artifacts_cancel.clone(),
            ))
        });

        match installed {
            Some((job_description, revision, cancel)) => {
                info!("Loaded history entry {entry_id}");
                self.request_artifacts(entry.resume_data, job_description, revision, cancel);
            }
            None => debug!("Session reset while loading history entry {entry_id}"),
        }
        Ok(())
    }

    /// The "Dismiss error" action.
    pub fn dismiss_error(&self) {
        self.mutate(|s| {
            if matches!(s.phase, SessionPhase::Error { .. }) {
                s.phase = SessionPhase::Idle;
            }
        });
    }

    // ── Background work ─────────────────────────────────────────────────────

    fn spawn_history_write(&self, data: ResumeData) {
        let history = Arc::clone(&self.inner.caps.history);
        tokio::spawn(async move {
            if let Err(e) = history.persist(&data).await {
                warn!("Failed to save resume history: {e}");
            }
        });
    }

    /// Starts one independent task per artifact kind. `cancel` belongs to the
    /// resume revision; installing another resume cancels it. A result is
    /// stored only if the resume it was computed for is still current.
    fn request_artifacts(
        &self,
        data: ResumeData,
        job_description: String,
        revision: u64,
        cancel: CancellationToken,
    ) {
        if job_description.trim().is_empty() {
            debug!("No job description; skipping derived artifacts");
            return;
        }

        let data = Arc::new(data);
        let job_description: Arc<str> = Arc::from(job_description);

        for kind in ArtifactKind::ALL {
            let this = self.clone();
            let data = Arc::clone(&data);
            let job_description = Arc::clone(&job_description);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let caps = &this.inner.caps;
                let Some(text) = artifacts::resolve_unless_cancelled(
                    kind,
                    &data,
                    &job_description,
                    &caps.provider,
                    &caps.cache,
                    &cancel,
                )
                .await
                else {
                    return;
                };
                this.mutate(|s| {
                    if s.data_revision == revision {
                        s.derived_artifacts.set(kind, text);
                    } else {
                        debug!("Dropping stale {}", kind.as_str());
                    }
                });
            });
        }
    }

    // ── Plumbing ────────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, GenerationSession> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The single mutation entry point.
    fn mutate<R>(&self, f: impl FnOnce(&mut GenerationSession) -> R) -> R {
        let mut session = self.lock();
        let result = f(&mut session);
        self.inner.snapshots.send_replace(session.snapshot());
        drop(session);
        self.touch();
        result
    }
}
