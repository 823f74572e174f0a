//! Betaseries show-metadata API configuration types

use crate::{get_env_or_default, get_required_env, parse_env, ConfigError, ConfigResult};

/// Betaseries API version sent with every request
pub const BETASERIES_API_VERSION: &str = "3.0";

/// Betaseries show-tracking API configuration
#[derive(Debug, Clone)]
pub struct BetaseriesConfig {
    /// Betaseries API base URL
    pub url: String,

    /// Application API key (`X-BetaSeries-Key`)
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BetaseriesConfig {
    /// Load Betaseries configuration from environment variables
    ///
    /// `BETASERIES_KEY` is required: the service cannot discover episodes
    /// without it, so a missing key is reported as an error.
    pub fn from_env() -> ConfigResult<Self> {
        let api_key = get_required_env("BETASERIES_KEY")?;

        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "BETASERIES_KEY".to_string(),
                "API key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            url: get_env_or_default("BETASERIES_URL", "https://api.betaseries.com"),
            api_key,
            timeout_secs: parse_env("BETASERIES_TIMEOUT", 30)?,
        })
    }

    /// Create a configuration with custom URL and API key (useful for testing)
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Get headers required for every Betaseries API request
    pub fn api_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("X-BetaSeries-Key", self.api_key.clone()),
            ("X-BetaSeries-Version", BETASERIES_API_VERSION.to_string()),
        ]
    }
}
