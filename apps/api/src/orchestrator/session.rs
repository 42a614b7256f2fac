use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::models::resume::ResumeData;
use crate::orchestrator::artifacts::ArtifactKind;
use crate::render::{self, StyleId};

/// Where the session is in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    ExtractingSource,
    AwaitingAiResult,
    Ready { has_document: bool },
    Error { message: String },
}

/// Secondary texts derived from the tailored resume. `None` means not yet available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedArtifacts {
    pub cover_letter: Option<String>,
    pub match_report: Option<String>,
}

impl DerivedArtifacts {
    pub fn set(&mut self, kind: ArtifactKind, text: String) {
        match kind {
            ArtifactKind::CoverLetter => self.cover_letter = Some(text),
            ArtifactKind::MatchReport => self.match_report = Some(text),
        }
    }
}

/// What subscribers see. The rendered document itself is fetched separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub resume_text: String,
    pub job_description: String,
    pub current_style: StyleId,
    pub last_resume_data: Option<ResumeData>,
    pub has_document: bool,
    pub derived_artifacts: DerivedArtifacts,
}

/// Mutable state of one generation session. Only the orchestrator touches it.
#[derive(Debug)]
pub struct GenerationSession {
    pub phase: SessionPhase,
    /// Normalized text of the current source document (or the user's correction of it).
    pub resume_text: String,
    pub job_description: String,
    pub current_style: StyleId,
    pub last_resume_data: Option<ResumeData>,
    pub rendered_document: Option<String>,
    pub derived_artifacts: DerivedArtifacts,

    /// Bumped on every source load. Work started under an older epoch is dropped.
    pub(super) epoch: u64,
    /// Bumped whenever `last_resume_data` is replaced wholesale.
    pub(super) data_revision: u64,
    pub(super) ai_in_flight: bool,
    pub(super) cancel: CancellationToken,
    /// Child of `cancel`, replaced with every `data_revision`.
    pub(super) artifacts_cancel: CancellationToken,
}

impl GenerationSession {
    pub fn new(style: StyleId) -> Self {
        let cancel = CancellationToken::new();
        let artifacts_cancel = cancel.child_token();
        Self {
            phase: SessionPhase::Idle,
            resume_text: String::new(),
            job_description: String::new(),
            current_style: style,
            last_resume_data: None,
            rendered_document: None,
            derived_artifacts: DerivedArtifacts::default(),
            epoch: 0,
            data_revision: 0,
            ai_in_flight: false,
            cancel,
            artifacts_cancel,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase.clone(),
            resume_text: self.resume_text.clone(),
            job_description: self.job_description.clone(),
            current_style: self.current_style,
            last_resume_data: self.last_resume_data.clone(),
            has_document: self.rendered_document.is_some(),
            derived_artifacts: self.derived_artifacts.clone(),
        }
    }

    /// Drops everything tied to the previous source document and cancels its
    /// in-flight work. The job description survives.
    pub(super) fn reset_for_new_source(&mut self) -> (u64, CancellationToken) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.artifacts_cancel = self.cancel.child_token();
        self.epoch += 1;
        self.data_revision += 1;
        self.ai_in_flight = false;

        self.resume_text.clear();
        self.last_resume_data = None;
        self.rendered_document = None;
        self.derived_artifacts = DerivedArtifacts::default();
        self.phase = SessionPhase::ExtractingSource;

        (self.epoch, self.cancel.clone())
    }

    /// Replaces the resume wholesale. Artifacts of the old resume no longer apply.
    pub(super) fn install_resume(&mut self, data: ResumeData) {
        self.artifacts_cancel.cancel();
        self.artifacts_cancel = self.cancel.child_token();
        self.data_revision += 1;
        self.derived_artifacts = DerivedArtifacts::default();
        self.last_resume_data = Some(data);
        self.rerender();
    }

    /// An AI call is in flight, or the source document is still being read.
    pub(super) fn is_busy(&self) -> bool {
        self.ai_in_flight || self.phase == SessionPhase::ExtractingSource
    }

    pub(super) fn rerender(&mut self) {
        self.rendered_document = self
            .last_resume_data
            .as_ref()
            .map(|data| render::render(data, self.current_style));
    }

    /// After a synchronous re-render: Ready, unless work is in flight or an error is showing.
    pub(super) fn settle(&mut self) {
        if matches!(self.phase, SessionPhase::Idle | SessionPhase::Ready { .. }) {
            self.phase = SessionPhase::Ready {
                has_document: self.rendered_document.is_some(),
            };
        }
    }

    pub(super) fn fail(&mut self, message: impl Into<String>) {
        self.phase = SessionPhase::Error {
            message: message.into(),
        };
    }
}
