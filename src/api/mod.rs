pub mod routes;
pub mod models;
pub mod errors;

use std::sync::Arc;
use std::time::Duration;
use axum::Router;
use tower_http::trace::TraceLayer;
use crate::challenge::{ChallengeCatalog, HintStore, VerificationService};
use crate::config::{TrackerBackend, VulnsnipConfig};
use crate::errors::VulnsnipError;
use crate::gate::{CommandGate, CommandTable};
use crate::tracker::{AttemptTracker, MemoryTracker, SqliteTracker};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<VerificationService>,
    pub gate: Arc<CommandGate>,
}

impl AppState {
    pub fn new(verifier: VerificationService, gate: CommandGate) -> Self {
        Self {
            verifier: Arc::new(verifier),
            gate: Arc::new(gate),
        }
    }
}

pub fn create_tracker(config: &VulnsnipConfig) -> Result<Arc<dyn AttemptTracker>, VulnsnipError> {
    let tracker: Arc<dyn AttemptTracker> = match config.tracker.backend {
        TrackerBackend::Memory => Arc::new(MemoryTracker::new()),
        TrackerBackend::Sqlite => Arc::new(SqliteTracker::open(&config.tracker.db_path)?),
    };
    info!(backend = tracker.backend_name(), "Attempt tracker ready");
    Ok(tracker)
}

pub async fn create_app_state(config: &VulnsnipConfig) -> Result<AppState, VulnsnipError> {
    let catalog = ChallengeCatalog::from_sources(config.challenges.source_dirs.clone());
    let hints = HintStore::new(config.challenges.hint_dir.clone());
    let tracker = create_tracker(config)?;
    let verifier = VerificationService::new(Arc::new(catalog), hints, tracker);

    let table = CommandTable::from_config(&config.debug_commands);
    info!(commands = table.len(), "Debug command allowlist loaded");
    let gate = CommandGate::new(table, Duration::from_secs(config.debug_commands.timeout_secs));

    Ok(AppState::new(verifier, gate))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/snippets", axum::routing::get(routes::snippets::serve_challenges_with_code_snippet))
        .route("/snippets/verdict", axum::routing::post(routes::snippets::check_vuln_lines))
        .route("/snippets/:challenge", axum::routing::get(routes::snippets::serve_code_snippet))
        .route("/snippets/:challenge/attempts", axum::routing::get(routes::snippets::get_attempts))
        .route("/api/debug/command", axum::routing::post(routes::debug::execute_debug_command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
