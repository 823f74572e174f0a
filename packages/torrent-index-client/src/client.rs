//! Torrent index client implementation

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use showrss_shared_config::TorrentIndexConfig;
use tracing::{debug, instrument, warn};

use crate::error::{TorrentIndexError, TorrentIndexResult};
use crate::models::{RawTorrent, TorrentResult};

/// Maximum error body size to prevent memory exhaustion (1KB)
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Default retry configuration
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;

/// Torrent index client with retry logic and connection pooling
#[derive(Debug, Clone)]
pub struct TorrentIndexClient {
    /// HTTP client with connection pool
    http_client: Client,
    /// Configuration
    config: TorrentIndexConfig,
    /// Number of attempts for transient failures
    retry_attempts: u32,
    /// Base delay for exponential backoff (milliseconds)
    retry_base_delay_ms: u64,
}

impl TorrentIndexClient {
    /// Create a new torrent index client from configuration
    pub fn new(config: &TorrentIndexConfig) -> TorrentIndexResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("showrss/0.1")
            .build()
            .map_err(TorrentIndexError::HttpError)?;

        Ok(Self {
            http_client,
            config: config.clone(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        })
    }

    /// Set retry configuration
    pub fn with_retry_config(mut self, attempts: u32, base_delay_ms: u64) -> Self {
        self.retry_attempts = attempts;
        self.retry_base_delay_ms = base_delay_ms;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &TorrentIndexConfig {
        &self.config
    }

    /// Execute an async operation with retry logic
    async fn with_retry<T, F, Fut>(&self, operation: F) -> TorrentIndexResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = TorrentIndexResult<T>>,
    {
        if self.retry_attempts == 0 {
            return operation().await;
        }

        let mut last_error = None;

        for attempt in 0..self.retry_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt < self.retry_attempts - 1 => {
                    let delay = self.retry_base_delay_ms * 2_u64.pow(attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.retry_attempts,
                        delay_ms = delay,
                        error = %e,
                        "Retrying torrent search after transient error"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    last_error = Some(e);
                }
                Err(e) => {
                    last_error = Some(e);
                    break;
                }
            }
        }

        Err(TorrentIndexError::RetriesExhausted {
            attempts: self.retry_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "Unknown error".to_string()),
        })
    }

    /// Truncate error body on a UTF-8 boundary
    fn truncate_error_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }

        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);

        format!("{}... (truncated)", &body[..truncate_at])
    }

    async fn search_internal(&self, query: &str) -> TorrentIndexResult<Vec<TorrentResult>> {
        let category = self.config.category.to_string();
        let mut params = vec![("q", query)];
        if self.config.category != 0 {
            params.push(("cat", category.as_str()));
        }

        let response = self
            .http_client
            .get(self.config.search_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TorrentIndexError::Timeout(self.config.timeout_secs)
                } else if e.is_connect() {
                    TorrentIndexError::ConnectionRefused(self.config.url.clone())
                } else {
                    TorrentIndexError::HttpError(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TorrentIndexError::ApiError {
                status: status.as_u16(),
                body: Self::truncate_error_body(body),
            });
        }

        let text = response.text().await?;
        let rows: Vec<RawTorrent> = serde_json::from_str(&text)?;

        Ok(rows
            .into_iter()
            .filter(|row| !row.is_placeholder())
            .map(TorrentResult::from)
            .collect())
    }

    /// Search the index for torrents matching a free-text query
    ///
    /// Results keep the order the index returned. An empty result set is
    /// not an error.
    #[instrument(skip(self), fields(category = self.config.category))]
    pub async fn search(&self, query: &str) -> TorrentIndexResult<Vec<TorrentResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TorrentIndexError::EmptyQuery);
        }

        let results = self.with_retry(|| self.search_internal(query)).await?;

        debug!(query = %query, result_count = results.len(), "Torrent search complete");

        Ok(results)
    }
}
