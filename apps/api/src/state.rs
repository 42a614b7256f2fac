use std::sync::Arc;

use crate::orchestrator::{Capabilities, SessionRegistry};
use crate::storage::{ApplicationStore, DocumentArchive};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionRegistry,
    /// The same capabilities every session uses. Handlers reach history through it.
    pub capabilities: Capabilities,
    /// Export surface for rendered documents.
    pub archive: Arc<dyn DocumentArchive>,
    /// Job-application tracker.
    pub applications: Arc<dyn ApplicationStore>,
}
