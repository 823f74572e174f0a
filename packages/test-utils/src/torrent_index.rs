//! Mock torrent index server for testing torrent searches
//!
//! Provides a [`MockTorrentIndexServer`] that simulates the apibay `q.php`
//! endpoint, including its string-typed fields and its "no results"
//! placeholder row.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock apibay-compatible torrent index
pub struct MockTorrentIndexServer {
    server: MockServer,
}

impl MockTorrentIndexServer {
    /// Start a new mock torrent index
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Mount results for an exact query string
    pub async fn mock_search(&self, query: &str, torrents: Vec<TorrentFixture>) {
        let rows: Vec<serde_json::Value> = torrents.iter().map(|t| t.to_json()).collect();

        Mock::given(method("GET"))
            .and(path("/q.php"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.server)
            .await;
    }

    /// Mount the placeholder row the index returns when nothing matches
    pub async fn mock_no_results(&self, query: &str) {
        Mock::given(method("GET"))
            .and(path("/q.php"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "0",
                "name": "No results returned",
                "info_hash": "0000000000000000000000000000000000000000",
                "leechers": "0",
                "seeders": "0",
                "num_files": "0",
                "size": "0",
                "username": "",
                "added": "0",
                "status": "member",
                "category": "0",
                "imdb": ""
            }])))
            .mount(&self.server)
            .await;
    }

    /// Mount a failure for an exact query string
    pub async fn mock_search_failure(&self, query: &str, status_code: u16) {
        Mock::given(method("GET"))
            .and(path("/q.php"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(status_code).set_body_string("index unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Get reference to the underlying mock server for custom mock setups
    pub fn inner(&self) -> &MockServer {
        &self.server
    }
}

/// One row of a `q.php` answer
#[derive(Debug, Clone)]
pub struct TorrentFixture {
    pub id: u64,
    pub name: String,
    pub info_hash: String,
    pub seeders: u32,
    pub leechers: u32,
    pub size: u64,
}

impl TorrentFixture {
    /// Create a fixture with a deterministic info hash derived from the ID
    pub fn new(id: u64, name: &str, seeders: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            info_hash: format!("{:040X}", id),
            seeders,
            leechers: seeders / 2,
            size: 1_073_741_824,
        }
    }

    /// Convert to JSON value; the index encodes every field as a string
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "info_hash": self.info_hash,
            "leechers": self.leechers.to_string(),
            "seeders": self.seeders.to_string(),
            "num_files": "1",
            "size": self.size.to_string(),
            "username": "uploader",
            "added": "1700000000",
            "status": "vip",
            "category": "208",
            "imdb": ""
        })
    }
}
