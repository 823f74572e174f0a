//! Manual refresh route
//!
//! `POST /refreshes` queues one admission token next to the timer's. The
//! request waits while the token queue is full, like the timer does.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use showrss_worker::{RefreshTrigger, TokenOrigin};
use tracing::{info, instrument};

use crate::error::ApiResult;

#[derive(Clone)]
pub struct RefreshState {
    pub trigger: RefreshTrigger,
}

impl RefreshState {
    pub fn new(trigger: RefreshTrigger) -> Self {
        Self { trigger }
    }
}

/// Body of a `202 Accepted` refresh response
#[derive(Debug, Serialize)]
pub struct RefreshAccepted {
    pub token_id: String,
    pub origin: TokenOrigin,
    pub issued_at: chrono::DateTime<chrono::Utc>,
    /// Tokens waiting in the queue, this one included
    pub pending: usize,
}

pub fn refresh_router(state: RefreshState) -> Router {
    Router::new()
        .route("/refreshes", post(request_refresh))
        .with_state(state)
}

#[instrument(skip(state))]
async fn request_refresh(
    State(state): State<RefreshState>,
) -> ApiResult<(StatusCode, Json<RefreshAccepted>)> {
    let token = state.trigger.inject(TokenOrigin::Manual).await?;
    let pending = state.trigger.pending();

    info!(token_id = %token.id, pending, "Manual refresh queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshAccepted {
            token_id: token.id.to_string(),
            origin: token.origin,
            issued_at: token.issued_at,
            pending,
        }),
    ))
}
