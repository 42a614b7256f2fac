//! Hand-written capability doubles shared by the orchestrator and route tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, JobApplication, NewApplication};
use crate::models::history::HistoryEntry;
use crate::models::resume::ResumeData;
use crate::orchestrator::{Capabilities, GenerationOrchestrator, SessionSnapshot};
use crate::render::fixtures::full_resume;
use crate::render::StyleId;
use crate::source::{ExtractionError, SourceDocument, SourceExtractor};
use crate::storage::{
    ApplicationStore, ArtifactCache, DocumentArchive, HistoryStore, StorageError,
};
use crate::tailoring::{ImageDocument, TailorError, TailoringProvider};

// ── Extractor ───────────────────────────────────────────────────────────────

/// Returns the document bytes as text; `corrupt.pdf` fails.
pub(crate) struct EchoExtractor {
    /// When set, extraction waits for a permit before answering.
    pub hold: Option<Arc<Notify>>,
}

#[async_trait]
impl SourceExtractor for EchoExtractor {
    async fn extract_text(&self, document: &SourceDocument) -> Result<String, ExtractionError> {
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if document.file_name.as_deref() == Some("corrupt.pdf") {
            return Err(ExtractionError::Pdf("bad xref table".to_string()));
        }
        Ok(String::from_utf8_lossy(&document.bytes).into_owned())
    }
}

pub(crate) fn text_document(text: &str) -> SourceDocument {
    SourceDocument {
        file_name: Some("resume.txt".to_string()),
        content_type: Some("text/plain".to_string()),
        bytes: Bytes::from(text.to_string()),
    }
}

// ── Provider ────────────────────────────────────────────────────────────────

/// Counts every call and records the inputs of the last tailor request.
pub(crate) struct FakeProvider {
    pub tailor_calls: AtomicUsize,
    pub artifact_calls: AtomicUsize,
    /// Artifact calls that ran to completion.
    pub artifacts_finished: AtomicUsize,
    pub last_tailor_input: Mutex<Option<(String, String)>>,
    pub tailor_result: Mutex<Result<ResumeData, String>>,
    pub cover_letter: Mutex<Option<String>>,
    pub match_report: Mutex<Option<String>>,
    pub image_text: Mutex<Option<String>>,
    /// When set, tailor calls wait for a permit before answering.
    pub hold: Option<Arc<Notify>>,
    /// When set, artifact calls wait for `notify_waiters` before answering.
    /// Their text is read before waiting.
    pub artifact_hold: Option<Arc<Notify>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            tailor_calls: AtomicUsize::new(0),
            artifact_calls: AtomicUsize::new(0),
            artifacts_finished: AtomicUsize::new(0),
            last_tailor_input: Mutex::new(None),
            tailor_result: Mutex::new(Ok(full_resume())),
            cover_letter: Mutex::new(Some("Dear hiring manager".to_string())),
            match_report: Mutex::new(Some("Score: 90/100".to_string())),
            image_text: Mutex::new(Some("Senior Rust Engineer".to_string())),
            hold: None,
            artifact_hold: None,
        }
    }
}

impl FakeProvider {
    pub fn tailor_calls(&self) -> usize {
        self.tailor_calls.load(Ordering::SeqCst)
    }

    pub fn artifact_calls(&self) -> usize {
        self.artifact_calls.load(Ordering::SeqCst)
    }

    pub fn artifacts_finished(&self) -> usize {
        self.artifacts_finished.load(Ordering::SeqCst)
    }

    async fn answer_artifact(&self, text: Option<String>) -> Option<String> {
        self.artifact_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.artifact_hold {
            hold.notified().await;
        }
        self.artifacts_finished.fetch_add(1, Ordering::SeqCst);
        text
    }
}

#[async_trait]
impl TailoringProvider for FakeProvider {
    async fn tailor_resume(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<ResumeData, TailorError> {
        self.tailor_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_tailor_input.lock().unwrap() =
            Some((resume_text.to_string(), job_description.to_string()));
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        self.tailor_result
            .lock()
            .unwrap()
            .clone()
            .map_err(TailorError::Provider)
    }

    async fn extract_text_from_image(&self, _image: &ImageDocument) -> Option<String> {
        self.image_text.lock().unwrap().clone()
    }

    async fn generate_cover_letter(&self, _: &ResumeData, _: &str) -> Option<String> {
        let text = self.cover_letter.lock().unwrap().clone();
        self.answer_artifact(text).await
    }

    async fn evaluate_resume(&self, _: &ResumeData, _: &str) -> Option<String> {
        let text = self.match_report.lock().unwrap().clone();
        self.answer_artifact(text).await
    }
}

// ── Storage ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct MemoryHistory {
    pub entries: Mutex<Vec<HistoryEntry>>,
    pub fail: bool,
}

impl MemoryHistory {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail {
            Err(StorageError::S3("history offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn persist(&self, data: &ResumeData) -> Result<HistoryEntry, StorageError> {
        self.check()?;
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            resume_data: data.clone(),
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn get(&self, id: Uuid) -> Result<Option<HistoryEntry>, StorageError> {
        self.check()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() != before)
    }

    async fn clear(&self) -> Result<u64, StorageError> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }
}

#[derive(Default)]
pub(crate) struct MemoryApplications {
    pub entries: Mutex<Vec<JobApplication>>,
}

#[async_trait]
impl ApplicationStore for MemoryApplications {
    async fn create(&self, application: &NewApplication) -> Result<JobApplication, StorageError> {
        let entry = JobApplication {
            id: Uuid::new_v4(),
            company_name: application.company_name.trim().to_string(),
            job_title: application.job_title.trim().to_string(),
            date_applied: Utc::now(),
            status: application.status,
            notes: application.notes.clone(),
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn list(&self) -> Result<Vec<JobApplication>, StorageError> {
        let mut entries = self.entries.lock().unwrap().clone();
        entries.sort_by(|a, b| b.date_applied.cmp(&a.date_applied));
        Ok(entries)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, StorageError> {
        let mut entries = self.entries.lock().unwrap();
        Ok(entries.iter_mut().find(|e| e.id == id).map(|entry| {
            entry.status = status;
            entry.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() != before)
    }

    async fn clear(&self) -> Result<u64, StorageError> {
        let mut entries = self.entries.lock().unwrap();
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }
}

#[derive(Default)]
pub(crate) struct MemoryCache {
    pub values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl ArtifactCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, text: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingArchive {
    pub stored: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl DocumentArchive for RecordingArchive {
    async fn store(&self, key: &str, html: String) -> Result<(), StorageError> {
        self.stored.lock().unwrap().push((key.to_string(), html));
        Ok(())
    }
}

// ── Harness ─────────────────────────────────────────────────────────────────

pub(crate) struct Harness {
    pub provider: Arc<FakeProvider>,
    pub history: Arc<MemoryHistory>,
    pub cache: Arc<MemoryCache>,
    pub applications: Arc<MemoryApplications>,
    pub extraction_hold: Option<Arc<Notify>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_provider(FakeProvider::default())
    }

    pub fn with_provider(provider: FakeProvider) -> Self {
        Self {
            provider: Arc::new(provider),
            history: Arc::new(MemoryHistory::default()),
            cache: Arc::new(MemoryCache::default()),
            applications: Arc::new(MemoryApplications::default()),
            extraction_hold: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            extractor: Arc::new(EchoExtractor {
                hold: self.extraction_hold.clone(),
            }),
            provider: self.provider.clone(),
            history: self.history.clone(),
            cache: self.cache.clone(),
        }
    }

    pub fn orchestrator(&self) -> GenerationOrchestrator {
        GenerationOrchestrator::new(self.capabilities(), StyleId::Modern)
    }

    /// An orchestrator with resume text and a job description, ready to tailor.
    pub async fn primed(&self) -> GenerationOrchestrator {
        let orchestrator = self.orchestrator();
        orchestrator
            .load_source(text_document("Grace Hopper. Experience at Navy"))
            .await;
        orchestrator.set_job_description("Senior Rust engineer, distributed systems".to_string());
        orchestrator
    }
}

/// Waits (bounded) until a published snapshot satisfies `pred`.
pub(crate) async fn wait_for_snapshot(
    orchestrator: &GenerationOrchestrator,
    pred: impl FnMut(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    let mut rx = orchestrator.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("timed out waiting for snapshot")
        .expect("snapshot channel closed")
        .clone();
    snapshot
}

/// Waits (bounded) until `cond` holds, polling.
pub(crate) async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for condition");
}
