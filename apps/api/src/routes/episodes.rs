//! Per-user episode listing
//!
//! `GET /:user/episodes` returns every episode the user follows with the
//! latest search result, ordered by show, season and episode.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use showrss_worker::{EpisodeCatalog, StoredEpisode};
use tracing::instrument;

use crate::error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct EpisodesState {
    pub catalog: Arc<dyn EpisodeCatalog>,
}

impl EpisodesState {
    pub fn new(catalog: Arc<dyn EpisodeCatalog>) -> Self {
        Self { catalog }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEpisodes {
    pub username: String,
    pub found: usize,
    pub episodes: Vec<StoredEpisode>,
}

pub fn episodes_router(state: EpisodesState) -> Router {
    Router::new()
        .route("/:user/episodes", get(list_user_episodes))
        .with_state(state)
}

#[instrument(skip(state))]
async fn list_user_episodes(
    State(state): State<EpisodesState>,
    Path(user): Path<String>,
) -> ApiResult<Json<UserEpisodes>> {
    let episodes = state
        .catalog
        .user_episodes(&user)
        .await?
        .ok_or_else(|| ApiError::not_found("user", user.clone()))?;

    Ok(Json(UserEpisodes {
        found: episodes.iter().filter(|e| e.found).count(),
        username: user,
        episodes,
    }))
}
