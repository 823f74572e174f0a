//! Torrent search through an apibay-compatible index

use async_trait::async_trait;
use showrss_torrent_index_client::{TorrentIndexClient, TorrentResult};
use tracing::{debug, instrument};

use crate::error::WorkerResult;
use crate::models::{Episode, SearchOutcome, TorrentSource};
use crate::traits::SearchProvider;

/// Picks the best-seeded torrent whose name carries the episode code
pub struct TorrentIndexSearchProvider {
    client: TorrentIndexClient,
    min_seeders: u32,
    quality: Option<String>,
}

impl TorrentIndexSearchProvider {
    /// Create a provider using the client's configured seeder floor and quality
    pub fn new(client: TorrentIndexClient) -> Self {
        let min_seeders = client.config().min_seeders;
        let quality = client.config().quality.clone();
        Self {
            client,
            min_seeders,
            quality,
        }
    }

    /// Choose a result for `episode` from raw index results
    pub fn select_best(&self, episode: &Episode, results: Vec<TorrentResult>) -> SearchOutcome {
        let code = episode.code.to_lowercase();
        let quality = self.quality.as_deref().map(str::to_lowercase);

        results
            .into_iter()
            .filter(|t| t.seeders >= self.min_seeders)
            .filter(|t| {
                let name = t.name.to_lowercase();
                carries_code(&name, &code) && quality.as_deref().map_or(true, |q| name.contains(q))
            })
            .max_by_key(|t| t.seeders)
            .map(|t| {
                SearchOutcome::Found(TorrentSource {
                    magnet_link: t.magnet_link(),
                    name: t.name,
                    seeders: t.seeders,
                })
            })
            .unwrap_or(SearchOutcome::NotFound)
    }
}

/// Whether `name` contains `code` as a whole token
///
/// `s01e01` matches `dark.s01e01.720p` and `dark.s01e01e02` but not
/// `dark.s01e011` or `dark.xs01e01`.
fn carries_code(name: &str, code: &str) -> bool {
    name.match_indices(code).any(|(start, matched)| {
        let before = name[..start].chars().next_back();
        let after = name[start + matched.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_ascii_digit())
    })
}

#[async_trait]
impl SearchProvider for TorrentIndexSearchProvider {
    #[instrument(skip_all, fields(episode_id = episode.id))]
    async fn search(&self, episode: &Episode) -> WorkerResult<SearchOutcome> {
        let query = episode.search_query(self.quality.as_deref());
        let results = self.client.search(&query).await?;
        let candidates = results.len();

        let outcome = self.select_best(episode, results);
        debug!(query = %query, candidates, found = outcome.is_found(), "Torrent search evaluated");

        Ok(outcome)
    }
}
