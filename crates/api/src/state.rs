use std::sync::Arc;

use polyglot_core::artifacts::ArtifactStore;
use polyglot_core::history::HistoryStore;
use polyglot_core::translation::Translator;

use crate::config::ServerConfig;
use crate::engine::JobRunner;
use crate::ws::{Broadcaster, WsManager};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live WebSocket connections.
    pub ws_manager: Arc<WsManager>,
    /// Fan-out of progress messages to `ws_manager`'s connections.
    pub broadcaster: Arc<Broadcaster>,
    /// Uploaded and translated files.
    pub artifacts: Arc<dyn ArtifactStore>,
    /// Terminal job records.
    pub history: Arc<dyn HistoryStore>,
    /// Background translation job runner.
    pub runner: Arc<JobRunner>,
    /// Database pool, when history is stored in Postgres.
    pub pool: Option<polyglot_db::DbPool>,
}

impl AppState {
    /// Wire the registry, broadcaster and job runner around the given
    /// collaborators.
    pub fn new(
        config: ServerConfig,
        artifacts: Arc<dyn ArtifactStore>,
        translator: Arc<dyn Translator>,
        history: Arc<dyn HistoryStore>,
        pool: Option<polyglot_db::DbPool>,
    ) -> Self {
        let ws_manager = Arc::new(WsManager::new());
        let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&ws_manager)));
        let runner = Arc::new(JobRunner::new(
            Arc::clone(&artifacts),
            translator,
            Arc::clone(&history),
            Arc::clone(&broadcaster),
        ));

        Self {
            config: Arc::new(config),
            ws_manager,
            broadcaster,
            artifacts,
            history,
            runner,
            pool,
        }
    }
}
