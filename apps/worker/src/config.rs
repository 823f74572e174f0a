//! Pipeline configuration loaded from environment variables
//!
//! Queue capacities and the refresh period are read with the shared
//! `parse_env` helper so invalid values are reported with the variable name.

use std::time::Duration;

use showrss_shared_config::{parse_env, ConfigError, ConfigResult};

/// Default period between timer-issued refresh tokens (1 hour)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Default capacity of the refresh token queue
pub const DEFAULT_TOKEN_CAPACITY: usize = 10;

/// Default capacity of the search queue
pub const DEFAULT_SEARCH_QUEUE_CAPACITY: usize = 1000;

/// Default capacity of the update queue
pub const DEFAULT_UPDATE_QUEUE_CAPACITY: usize = 100;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Period of the refresh timer
    pub refresh_interval: Duration,

    /// Capacity of the refresh token queue
    pub token_capacity: usize,

    /// Capacity of the search queue
    pub search_queue_capacity: usize,

    /// Capacity of the update queue
    pub update_queue_capacity: usize,

    /// Upper bound on concurrent searches; `None` spawns one task per episode
    pub max_search_workers: Option<usize>,
}

impl PipelineConfig {
    /// Load pipeline configuration from environment variables
    ///
    /// `MAX_SEARCH_WORKERS=0` (the default) leaves search fan-out unbounded.
    pub fn from_env() -> ConfigResult<Self> {
        let refresh_secs: u64 =
            parse_env("REFRESH_INTERVAL_SECS", DEFAULT_REFRESH_INTERVAL_SECS)?;
        let max_search_workers: usize = parse_env("MAX_SEARCH_WORKERS", 0)?;

        let config = Self {
            refresh_interval: Duration::from_secs(refresh_secs),
            token_capacity: parse_env("REFRESH_TOKEN_CAPACITY", DEFAULT_TOKEN_CAPACITY)?,
            search_queue_capacity: parse_env(
                "SEARCH_QUEUE_CAPACITY",
                DEFAULT_SEARCH_QUEUE_CAPACITY,
            )?,
            update_queue_capacity: parse_env(
                "UPDATE_QUEUE_CAPACITY",
                DEFAULT_UPDATE_QUEUE_CAPACITY,
            )?,
            max_search_workers: (max_search_workers > 0).then_some(max_search_workers),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject zero capacities and a zero refresh period
    pub fn validate(&self) -> ConfigResult<()> {
        let checks = [
            ("REFRESH_INTERVAL_SECS", self.refresh_interval.as_secs() as usize),
            ("REFRESH_TOKEN_CAPACITY", self.token_capacity),
            ("SEARCH_QUEUE_CAPACITY", self.search_queue_capacity),
            ("UPDATE_QUEUE_CAPACITY", self.update_queue_capacity),
        ];

        for (name, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidValue(
                    name.to_string(),
                    "must be greater than zero".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            token_capacity: DEFAULT_TOKEN_CAPACITY,
            search_queue_capacity: DEFAULT_SEARCH_QUEUE_CAPACITY,
            update_queue_capacity: DEFAULT_UPDATE_QUEUE_CAPACITY,
            max_search_workers: None,
        }
    }
}
