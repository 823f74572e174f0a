//! API server configuration

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use showrss_shared_config::{parse_env, CommonConfig, DatabaseConfig, Environment};
use showrss_worker::PipelineConfig;

/// Default listen address
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";

/// Default time the listener gets to finish in-flight requests on shutdown
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Listen address (default: 0.0.0.0:8000)
    pub http_addr: SocketAddr,

    /// Grace period for in-flight requests after a shutdown signal
    pub shutdown_grace: Duration,

    /// Queue capacities and refresh period of the hosted pipeline
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production `DATABASE_URL` must be set explicitly. `BETASERIES_KEY`
    /// is always required.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        if environment.is_production() {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        let pipeline = PipelineConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load pipeline config: {}", e))?;

        let shutdown_grace_secs: u64 =
            parse_env("SHUTDOWN_GRACE_SECS", DEFAULT_SHUTDOWN_GRACE_SECS)
                .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(Self {
            common,
            http_addr: Self::load_http_addr()?,
            shutdown_grace: Duration::from_secs(shutdown_grace_secs),
            pipeline,
        })
    }

    fn load_http_addr() -> Result<SocketAddr> {
        env::var("HTTP_ADDR")
            .unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string())
            .trim()
            .parse()
            .context("Invalid HTTP_ADDR value")
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }
}
