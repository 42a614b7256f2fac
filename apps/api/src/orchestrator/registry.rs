use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};
use uuid::Uuid;

use crate::orchestrator::{Capabilities, GenerationOrchestrator};
use crate::render::StyleId;

/// Every live session, keyed by id.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, GenerationOrchestrator>>>,
    caps: Capabilities,
    default_style: StyleId,
}

impl SessionRegistry {
    pub fn new(caps: Capabilities, default_style: StyleId) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            caps,
            default_style,
        }
    }

    pub async fn create(&self) -> (Uuid, GenerationOrchestrator) {
        let id = Uuid::new_v4();
        let orchestrator = GenerationOrchestrator::new(self.caps.clone(), self.default_style);
        self.sessions.write().await.insert(id, orchestrator.clone());
        info!("Created session {id} (style {})", self.default_style);
        (id, orchestrator)
    }

    pub async fn get(&self, id: Uuid) -> Option<GenerationOrchestrator> {
        let orchestrator = self.sessions.read().await.get(&id).cloned()?;
        orchestrator.touch();
        Some(orchestrator)
    }

    /// Removes the session and cancels its in-flight work.
    pub async fn remove(&self, id: Uuid) -> bool {
        let Some(orchestrator) = self.sessions.write().await.remove(&id) else {
            return false;
        };
        orchestrator.close();
        info!("Closed session {id}");
        true
    }

    /// Drops every session untouched for at least `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, orchestrator| {
            if orchestrator.idle_for() < max_idle {
                return true;
            }
            debug!("Evicting idle session {id}");
            orchestrator.close();
            false
        });
        before - sessions.len()
    }

    /// Background sweep that runs `evict_idle` every `every`.
    pub fn spawn_eviction(&self, every: Duration, max_idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut tick = interval(every);
            loop {
                tick.tick().await;
                let evicted = registry.evict_idle(max_idle).await;
                if evicted > 0 {
                    info!("Evicted {evicted} idle sessions, {} live", registry.len().await);
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
