use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::resume::ResumeData;
use crate::storage::artifact_cache::artifact_key;
use crate::storage::ArtifactCache;
use crate::tailoring::TailoringProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    CoverLetter,
    MatchReport,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::CoverLetter, ArtifactKind::MatchReport];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::CoverLetter => "cover_letter",
            ArtifactKind::MatchReport => "match_report",
        }
    }

    /// Shown in place of the artifact when the provider produced nothing.
    pub fn failure_placeholder(&self) -> &'static str {
        match self {
            ArtifactKind::CoverLetter => "Failed to generate.",
            ArtifactKind::MatchReport => "Failed to analyze.",
        }
    }
}

/// Cache first, then the provider. Always resolves to text: the provider's
/// output or the kind's placeholder.
pub(super) async fn resolve_artifact(
    kind: ArtifactKind,
    data: &ResumeData,
    job_description: &str,
    provider: &Arc<dyn TailoringProvider>,
    cache: &Arc<dyn ArtifactCache>,
) -> String {
    let key = artifact_key(kind.as_str(), data, job_description);

    match cache.get(&key).await {
        Ok(Some(text)) => {
            debug!("Artifact cache hit for {key}");
            return text;
        }
        Ok(None) => {}
        Err(e) => warn!("Artifact cache read failed for {key}: {e}"),
    }

    let generated = match kind {
        ArtifactKind::CoverLetter => provider.generate_cover_letter(data, job_description).await,
        ArtifactKind::MatchReport => provider.evaluate_resume(data, job_description).await,
    };

    match generated.filter(|text| !text.trim().is_empty()) {
        Some(text) => {
            let cache = Arc::clone(cache);
            let value = text.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.put(&key, &value).await {
                    warn!("Artifact cache write failed for {key}: {e}");
                }
            });
            text
        }
        None => {
            warn!("No {} produced; using placeholder", kind.as_str());
            kind.failure_placeholder().to_string()
        }
    }
}

/// Runs `resolve_artifact` unless the session is reset first.
pub(super) async fn resolve_unless_cancelled(
    kind: ArtifactKind,
    data: &ResumeData,
    job_description: &str,
    provider: &Arc<dyn TailoringProvider>,
    cache: &Arc<dyn ArtifactCache>,
    cancel: &CancellationToken,
) -> Option<String> {
    tokio::select! {
        _ = cancel.cancelled() => None,
        text = resolve_artifact(kind, data, job_description, provider, cache) => Some(text),
    }
}
