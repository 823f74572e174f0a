//! HTTP route handlers for the showrss API
//!
//! - Health check and readiness endpoints
//! - Manual refresh injection
//! - Per-user episode listing

pub mod episodes;
pub mod health;
pub mod refresh;

pub use episodes::{episodes_router, EpisodesState};
pub use health::{health_router, HealthState};
pub use refresh::{refresh_router, RefreshState};

use std::sync::Arc;

use axum::{routing::get, Router};
use showrss_worker::{EpisodeCatalog, RefreshTrigger};
use tower_http::trace::TraceLayer;

use crate::services::HealthService;

/// Everything the handlers need from the running process
#[derive(Clone)]
pub struct AppState {
    pub health_service: Arc<HealthService>,
    pub trigger: RefreshTrigger,
    pub catalog: Arc<dyn EpisodeCatalog>,
}

/// Build the full application router
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Nested health routes: /health, /health/live, /health/ready
        .nest("/health", health_router(HealthState::new(state.health_service)))
        .merge(refresh_router(RefreshState::new(state.trigger)))
        .merge(episodes_router(EpisodesState::new(state.catalog)))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    "Welcome to showrss - fresh episodes from the shows you follow"
}
