//! Refresh stage
//!
//! Waits for an admission token, asks the episode source which episodes
//! need a search, and queues them for the search stage.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::WorkerResult;
use crate::models::{AdmissionToken, Episode};
use crate::queue::QueueSender;
use crate::rate_limiter::RateLimiter;
use crate::traits::EpisodeSource;

/// Stage name used in logs
pub const STAGE: &str = "refresh";

/// What a single refresh cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every enumerated episode was queued
    Completed { enqueued: usize },
    /// Enumeration failed; nothing was queued
    Skipped,
}

/// Run the refresh stage until the token queue closes or the search queue
/// goes away
pub async fn run(
    mut limiter: RateLimiter,
    source: Arc<dyn EpisodeSource>,
    searches: QueueSender<Episode>,
) {
    info!("Refresh stage started");

    while let Some(token) = limiter.next_token().await {
        if let Err(e) = run_cycle(&token, source.as_ref(), &searches).await {
            e.log(STAGE);
            break;
        }
    }

    info!("Refresh stage stopped");
}

/// Run one refresh cycle
///
/// An enumeration failure is logged and reported as [`CycleOutcome::Skipped`].
/// The only error returned is a closed search queue, which ends the stage.
#[instrument(skip_all, fields(token_id = %token.id, origin = %token.origin))]
pub async fn run_cycle(
    token: &AdmissionToken,
    source: &dyn EpisodeSource,
    searches: &QueueSender<Episode>,
) -> WorkerResult<CycleOutcome> {
    let episodes = match source.episodes_needing_search().await {
        Ok(episodes) => episodes,
        Err(e) => {
            e.log(STAGE);
            warn!("Episode enumeration failed, refresh cycle skipped");
            return Ok(CycleOutcome::Skipped);
        }
    };

    let total = episodes.len();
    for episode in episodes {
        searches.send(episode).await?;
    }

    info!(enqueued = total, "Refresh cycle queued episodes for search");
    Ok(CycleOutcome::Completed { enqueued: total })
}
