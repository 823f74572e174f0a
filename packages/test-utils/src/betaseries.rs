//! Mock Betaseries server for testing episode discovery
//!
//! Provides a [`MockBetaseriesServer`] that simulates the `episodes/list`
//! endpoint for testing without a real Betaseries account.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock Betaseries server
///
/// Every mock requires the configured API key, so a client sending the wrong
/// key gets no match (404) instead of silently succeeding.
pub struct MockBetaseriesServer {
    server: MockServer,
    api_key: String,
}

impl MockBetaseriesServer {
    /// Start a new mock Betaseries server with default API key
    pub async fn start() -> Self {
        Self::start_with_api_key("test-betaseries-key").await
    }

    /// Start a new mock Betaseries server with custom API key
    pub async fn start_with_api_key(api_key: &str) -> Self {
        let server = MockServer::start().await;
        Self {
            server,
            api_key: api_key.to_string(),
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Mount the unseen episode list for one member token
    pub async fn mock_unseen_episodes(&self, token: &str, shows: Vec<BetaseriesShowFixture>) {
        let shows_json: Vec<serde_json::Value> = shows.iter().map(|s| s.to_json()).collect();

        Mock::given(method("GET"))
            .and(path("/episodes/list"))
            .and(header("X-BetaSeries-Key", self.api_key.as_str()))
            .and(header("X-BetaSeries-Token", token))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "shows": shows_json,
                "errors": []
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an "invalid token" error (code 2001) for one member token
    pub async fn mock_invalid_token(&self, token: &str) {
        self.mock_api_error(token, 400, 2001, "Invalid token.").await;
    }

    /// Mount an arbitrary Betaseries error payload for one member token
    pub async fn mock_api_error(&self, token: &str, status_code: u16, code: i32, text: &str) {
        Mock::given(method("GET"))
            .and(path("/episodes/list"))
            .and(header("X-BetaSeries-Token", token))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "errors": [{"code": code, "text": text}]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a server failure for every request
    pub async fn mock_server_error(&self, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/episodes/list"))
            .respond_with(ResponseTemplate::new(status_code))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received so far
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }
}

/// A followed show with its unseen episodes
#[derive(Debug, Clone)]
pub struct BetaseriesShowFixture {
    pub id: i64,
    pub title: String,
    pub unseen: Vec<BetaseriesEpisodeFixture>,
}

impl BetaseriesShowFixture {
    /// Create a show with no unseen episodes
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            unseen: Vec::new(),
        }
    }

    /// Add season 1 episodes `from..=to`, with IDs derived from the show ID
    pub fn with_episodes(mut self, from: i32, to: i32) -> Self {
        for number in from..=to {
            self.unseen.push(BetaseriesEpisodeFixture::new(
                self.id * 1000 + i64::from(number),
                1,
                number,
            ));
        }
        self
    }

    /// Add a single episode
    pub fn with_episode(mut self, episode: BetaseriesEpisodeFixture) -> Self {
        self.unseen.push(episode);
        self
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "remaining": self.unseen.len(),
            "unseen": self
                .unseen
                .iter()
                .map(|e| e.to_json(self))
                .collect::<Vec<_>>()
        })
    }
}

/// An unseen episode entry
#[derive(Debug, Clone)]
pub struct BetaseriesEpisodeFixture {
    pub id: i64,
    pub title: String,
    pub season: i32,
    pub episode: i32,
}

impl BetaseriesEpisodeFixture {
    /// Create an episode fixture with a generated title
    pub fn new(id: i64, season: i32, episode: i32) -> Self {
        Self {
            id,
            title: format!("Episode {}", episode),
            season,
            episode,
        }
    }

    /// Episode code as Betaseries formats it
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode)
    }

    /// Convert to JSON value, embedding the parent show summary
    pub fn to_json(&self, show: &BetaseriesShowFixture) -> serde_json::Value {
        json!({
            "id": self.id,
            "title": self.title,
            "season": self.season,
            "episode": self.episode,
            "code": self.code(),
            "show": {"id": show.id, "title": show.title}
        })
    }
}
