//! Betaseries API client implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use showrss_shared_config::BetaseriesConfig;
use tracing::{debug, instrument, warn};

use crate::error::{BetaseriesError, BetaseriesResult};
use crate::models::{EpisodesListResponse, ErrorResponse, UnseenEpisode};

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Header carrying the member access token
const TOKEN_HEADER: &str = "X-BetaSeries-Token";

/// Betaseries API client
#[derive(Clone)]
pub struct BetaseriesClient {
    http_client: Client,
    config: BetaseriesConfig,
    max_retries: u32,
}

impl fmt::Debug for BetaseriesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BetaseriesClient")
            .field("url", &self.config.url)
            .field("api_key", &"[REDACTED]")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl BetaseriesClient {
    /// Create a new Betaseries client from configuration
    ///
    /// # Errors
    /// Returns `BetaseriesError::MissingApiKey` if the API key is empty
    pub fn new(config: &BetaseriesConfig) -> BetaseriesResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(BetaseriesError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .user_agent("showrss/0.1")
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Override the number of retries for transient failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> BetaseriesResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = BetaseriesResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Betaseries request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Make an authenticated GET request and return the body
    async fn make_request(&self, path: &str, token: &str) -> BetaseriesResult<String> {
        let mut request = self.http_client.get(self.config.api_url(path));
        for (name, value) in self.config.api_headers() {
            request = request.header(name, value);
        }

        let response = request
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BetaseriesError::Timeout
                } else {
                    BetaseriesError::Http(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Betaseries API rate limited");
            return Err(BetaseriesError::RateLimited);
        }
        if status.is_server_error() {
            return Err(BetaseriesError::Server(status.as_u16()));
        }

        let text = response.text().await.map_err(BetaseriesError::Http)?;

        if let Some(error) = Self::parse_api_error(&text) {
            return Err(error);
        }
        if !status.is_success() {
            return Err(BetaseriesError::Api {
                code: i32::from(status.as_u16()),
                message: format!("unexpected HTTP status {}", status),
            });
        }

        Ok(text)
    }

    /// Extract the first error of an error payload, if any
    fn parse_api_error(text: &str) -> Option<BetaseriesError> {
        let response = serde_json::from_str::<ErrorResponse>(text).ok()?;
        let first = response.errors.into_iter().next()?;
        Some(BetaseriesError::from_api(first.code, first.text))
    }

    /// List the episodes a member follows but has not watched yet
    ///
    /// # Arguments
    /// * `access_token` - The member's Betaseries access token
    ///
    /// # Errors
    /// - `BetaseriesError::InvalidInput` - If the token is empty
    /// - `BetaseriesError::InvalidToken` - If Betaseries rejects the token
    /// - `BetaseriesError::Api` - If Betaseries returns another error
    /// - `BetaseriesError::Http` - If the HTTP request fails
    #[instrument(skip(self, access_token))]
    pub async fn unseen_episodes(&self, access_token: &str) -> BetaseriesResult<Vec<UnseenEpisode>> {
        let token = access_token.trim();
        if token.is_empty() {
            return Err(BetaseriesError::InvalidInput(
                "access token cannot be empty".to_string(),
            ));
        }

        debug!("Fetching unseen episodes from Betaseries");

        let text = self
            .with_retry(|| async { self.make_request("episodes/list", token).await })
            .await?;

        let response: EpisodesListResponse = serde_json::from_str(&text)?;
        if let Some(first) = response.errors.into_iter().next() {
            return Err(BetaseriesError::from_api(first.code, first.text));
        }

        let episodes: Vec<UnseenEpisode> = response
            .shows
            .into_iter()
            .flat_map(|mut show| {
                let unseen = std::mem::take(&mut show.unseen);
                unseen
                    .into_iter()
                    .map(move |raw| raw.into_unseen(&show))
                    .collect::<Vec<_>>()
            })
            .collect();

        debug!(episode_count = episodes.len(), "Fetched unseen episodes");

        Ok(episodes)
    }
}
