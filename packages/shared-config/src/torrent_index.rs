//! Torrent index configuration types

use crate::{get_env_or_default, parse_env, ConfigResult};

/// apibay category for HD TV episodes
pub const DEFAULT_CATEGORY: u32 = 208;

/// Torrent index (apibay-compatible) search configuration
#[derive(Debug, Clone)]
pub struct TorrentIndexConfig {
    /// Index server URL
    pub url: String,

    /// Category filter sent with every query (0 disables filtering)
    pub category: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Minimum seeders for a result to count as a usable source
    pub min_seeders: u32,

    /// Optional quality marker appended to queries (e.g., 720p)
    pub quality: Option<String>,
}

impl TorrentIndexConfig {
    /// Load torrent index configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            url: get_env_or_default("TORRENT_INDEX_URL", "https://apibay.org"),
            category: parse_env("TORRENT_INDEX_CATEGORY", DEFAULT_CATEGORY)?,
            timeout_secs: parse_env("TORRENT_INDEX_TIMEOUT", 30)?,
            min_seeders: parse_env("TORRENT_MIN_SEEDERS", 1)?,
            quality: std::env::var("TORRENT_QUALITY")
                .ok()
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Get the full URL for the search endpoint
    pub fn search_url(&self) -> String {
        format!("{}/q.php", self.url.trim_end_matches('/'))
    }
}

impl Default for TorrentIndexConfig {
    fn default() -> Self {
        Self {
            url: "https://apibay.org".to_string(),
            category: DEFAULT_CATEGORY,
            timeout_secs: 30,
            min_seeders: 1,
            quality: None,
        }
    }
}
