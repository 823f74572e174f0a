//! Collaborator seams of the pipeline
//!
//! Stages only talk to the outside world through these traits. All of them
//! must be safe for concurrent use: search calls run in parallel.

use async_trait::async_trait;

use crate::error::WorkerResult;
use crate::models::{Episode, SearchOutcome, StoredEpisode, TrackedUser};

/// Enumerates the episodes a refresh cycle must search for
#[async_trait]
pub trait EpisodeSource: Send + Sync {
    async fn episodes_needing_search(&self) -> WorkerResult<Vec<Episode>>;
}

/// Looks up a download source for one episode
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, episode: &Episode) -> WorkerResult<SearchOutcome>;
}

/// Persists search results; must be idempotent for a given episode
#[async_trait]
pub trait EpisodeStore: Send + Sync {
    async fn persist(&self, episode: &Episode, outcome: &SearchOutcome) -> WorkerResult<()>;
}

/// Storage side of episode discovery
#[async_trait]
pub trait ShowTracking: Send + Sync {
    /// Users whose Betaseries accounts are followed
    async fn tracked_users(&self) -> WorkerResult<Vec<TrackedUser>>;

    /// Record that a user follows these episodes
    async fn link_user_episodes(&self, username: &str, episodes: &[Episode]) -> WorkerResult<()>;

    /// IDs among `episode_ids` that already have a download source
    async fn found_episode_ids(&self, episode_ids: &[i64]) -> WorkerResult<Vec<i64>>;
}

/// Read side used by the per-user episode listing
#[async_trait]
pub trait EpisodeCatalog: Send + Sync {
    /// `None` when the user is unknown
    async fn user_episodes(&self, username: &str) -> WorkerResult<Option<Vec<StoredEpisode>>>;
}
