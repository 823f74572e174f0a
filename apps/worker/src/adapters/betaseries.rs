//! Episode discovery through Betaseries

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use showrss_betaseries_client::{BetaseriesClient, UnseenEpisode};
use tracing::{debug, info, instrument};

use crate::error::{WorkerError, WorkerResult};
use crate::models::Episode;
use crate::traits::{EpisodeSource, ShowTracking};

impl From<UnseenEpisode> for Episode {
    fn from(unseen: UnseenEpisode) -> Self {
        Self {
            id: unseen.id,
            show_id: unseen.show_id,
            show_name: unseen.show_title,
            name: unseen.title,
            code: unseen.code,
            season: unseen.season,
            episode: unseen.episode,
        }
    }
}

/// Episodes followed by tracked users that have no download source yet
pub struct BetaseriesEpisodeSource {
    client: BetaseriesClient,
    tracking: Arc<dyn ShowTracking>,
}

impl BetaseriesEpisodeSource {
    pub fn new(client: BetaseriesClient, tracking: Arc<dyn ShowTracking>) -> Self {
        Self { client, tracking }
    }
}

#[async_trait]
impl EpisodeSource for BetaseriesEpisodeSource {
    /// Fetch every tracked user's unseen episodes
    ///
    /// A user whose fetch fails is skipped; failing to list users or to
    /// write to storage fails the whole enumeration.
    #[instrument(skip(self))]
    async fn episodes_needing_search(&self) -> WorkerResult<Vec<Episode>> {
        let users = self.tracking.tracked_users().await?;

        let mut seen = HashSet::new();
        let mut episodes = Vec::new();
        let mut skipped_users = 0usize;

        for user in &users {
            let unseen = match self.client.unseen_episodes(&user.betaseries_token).await {
                Ok(unseen) => unseen,
                Err(e) => {
                    WorkerError::betaseries_for_user(&user.username, e).log("refresh");
                    skipped_users += 1;
                    continue;
                }
            };

            let user_episodes: Vec<Episode> = unseen.into_iter().map(Episode::from).collect();
            debug!(
                username = %user.username,
                unseen = user_episodes.len(),
                "Fetched unseen episodes"
            );

            self.tracking
                .link_user_episodes(&user.username, &user_episodes)
                .await?;

            episodes.extend(user_episodes.into_iter().filter(|e| seen.insert(e.id)));
        }

        let ids: Vec<i64> = episodes.iter().map(|e| e.id).collect();
        let found: HashSet<i64> = if ids.is_empty() {
            HashSet::new()
        } else {
            self.tracking.found_episode_ids(&ids).await?.into_iter().collect()
        };
        episodes.retain(|e| !found.contains(&e.id));

        info!(
            users = users.len(),
            skipped_users,
            already_found = found.len(),
            to_search = episodes.len(),
            "Episode enumeration complete"
        );

        Ok(episodes)
    }
}
