//! Episode repository
//!
//! Owns the `users`, `episodes` and `user_episodes` tables. Episode rows are
//! keyed by the Betaseries episode ID, so every write is an upsert and
//! replaying the same outcome leaves the row unchanged apart from
//! `last_searched_at`. A found episode is never downgraded: a later miss
//! only moves `last_searched_at`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::WorkerResult;
use crate::models::{Episode, SearchOutcome, StoredEpisode, TrackedUser};
use crate::traits::{EpisodeCatalog, EpisodeStore, ShowTracking};

/// Repository for episode discovery and search results
#[derive(Clone)]
pub struct PgEpisodeRepository {
    pool: PgPool,
}

impl PgEpisodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EpisodeStore for PgEpisodeRepository {
    #[tracing::instrument(skip_all, fields(episode_id = episode.id, found = outcome.is_found()))]
    async fn persist(&self, episode: &Episode, outcome: &SearchOutcome) -> WorkerResult<()> {
        let (magnet_link, torrent_name, seeders) = match outcome {
            SearchOutcome::Found(source) => (
                Some(source.magnet_link.as_str()),
                Some(source.name.as_str()),
                Some(i32::try_from(source.seeders).unwrap_or(i32::MAX)),
            ),
            SearchOutcome::NotFound => (None, None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO episodes (id, show_id, show_name, name, code, season, episode,
                                  found, magnet_link, torrent_name, seeders, last_searched_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
            ON CONFLICT (id)
            DO UPDATE SET
                found = episodes.found OR EXCLUDED.found,
                magnet_link = CASE WHEN EXCLUDED.found
                                   THEN EXCLUDED.magnet_link ELSE episodes.magnet_link END,
                torrent_name = CASE WHEN EXCLUDED.found
                                    THEN EXCLUDED.torrent_name ELSE episodes.torrent_name END,
                seeders = CASE WHEN EXCLUDED.found
                               THEN EXCLUDED.seeders ELSE episodes.seeders END,
                last_searched_at = NOW(),
                updated_at = NOW()
            "#,
        )
        .bind(episode.id)
        .bind(episode.show_id)
        .bind(&episode.show_name)
        .bind(&episode.name)
        .bind(&episode.code)
        .bind(episode.season)
        .bind(episode.episode)
        .bind(outcome.is_found())
        .bind(magnet_link)
        .bind(torrent_name)
        .bind(seeders)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ShowTracking for PgEpisodeRepository {
    async fn tracked_users(&self) -> WorkerResult<Vec<TrackedUser>> {
        let users = sqlx::query_as::<_, TrackedUser>(
            r#"
            SELECT username, betaseries_token
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Upsert episode metadata and the user links in one transaction
    #[tracing::instrument(skip(self, episodes), fields(episode_count = episodes.len()))]
    async fn link_user_episodes(&self, username: &str, episodes: &[Episode]) -> WorkerResult<()> {
        if episodes.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = episodes.iter().map(|e| e.id).collect();
        let show_ids: Vec<i64> = episodes.iter().map(|e| e.show_id).collect();
        let show_names: Vec<String> = episodes.iter().map(|e| e.show_name.clone()).collect();
        let names: Vec<String> = episodes.iter().map(|e| e.name.clone()).collect();
        let codes: Vec<String> = episodes.iter().map(|e| e.code.clone()).collect();
        let seasons: Vec<i32> = episodes.iter().map(|e| e.season).collect();
        let numbers: Vec<i32> = episodes.iter().map(|e| e.episode).collect();

        let mut tx = self.pool.begin().await?;

        // Metadata only: search results stay untouched
        sqlx::query(
            r#"
            INSERT INTO episodes (id, show_id, show_name, name, code, season, episode)
            SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::text[], $4::text[],
                                 $5::text[], $6::int[], $7::int[])
            ON CONFLICT (id)
            DO UPDATE SET
                show_name = EXCLUDED.show_name,
                name = EXCLUDED.name,
                code = EXCLUDED.code,
                updated_at = NOW()
            "#,
        )
        .bind(&ids)
        .bind(&show_ids)
        .bind(&show_names)
        .bind(&names)
        .bind(&codes)
        .bind(&seasons)
        .bind(&numbers)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_episodes (username, episode_id)
            SELECT $1, episode_id FROM UNNEST($2::bigint[]) AS t(episode_id)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(username)
        .bind(&ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn found_episode_ids(&self, episode_ids: &[i64]) -> WorkerResult<Vec<i64>> {
        let found = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM episodes
            WHERE id = ANY($1) AND found
            "#,
        )
        .bind(episode_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(found)
    }
}

#[async_trait]
impl EpisodeCatalog for PgEpisodeRepository {
    async fn user_episodes(&self, username: &str) -> WorkerResult<Option<Vec<StoredEpisode>>> {
        let known: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        if !known {
            return Ok(None);
        }

        let episodes = sqlx::query_as::<_, StoredEpisode>(
            r#"
            SELECT e.id, e.show_id, e.show_name, e.name, e.code, e.season, e.episode,
                   e.found, e.magnet_link, e.torrent_name, e.seeders, e.last_searched_at
            FROM episodes e
            JOIN user_episodes ue ON ue.episode_id = e.id
            WHERE ue.username = $1
            ORDER BY e.show_name, e.season, e.episode
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(episodes))
    }
}
