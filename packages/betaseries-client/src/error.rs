//! Betaseries API error types

use thiserror::Error;

/// Betaseries error code for an unknown or expired member token
pub const ERROR_INVALID_TOKEN: i32 = 2001;

/// Betaseries error code for an unknown application key
pub const ERROR_INVALID_API_KEY: i32 = 1001;

/// Betaseries API client errors
#[derive(Error, Debug)]
pub enum BetaseriesError {
    /// API key is missing
    #[error("API key is required for Betaseries API access")]
    MissingApiKey,

    /// Invalid input provided to API method
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse Betaseries response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Betaseries API returned an error payload
    #[error("Betaseries API error {code}: {message}")]
    Api { code: i32, message: String },

    /// The member access token was rejected
    #[error("Betaseries access token rejected")]
    InvalidToken,

    /// The application key was rejected
    #[error("Betaseries API key rejected")]
    InvalidApiKey,

    /// Betaseries answered with a server error
    #[error("Betaseries server error: HTTP {0}")]
    Server(u16),

    /// Rate limited by Betaseries
    #[error("Rate limited by Betaseries API")]
    RateLimited,

    /// Request timeout
    #[error("Request to Betaseries timed out")]
    Timeout,
}

impl BetaseriesError {
    /// Check if this error is retryable (transient failure)
    ///
    /// Retries on timeouts, rate limiting, transport errors and 5xx answers.
    /// Rejected credentials and API errors are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            BetaseriesError::Timeout | BetaseriesError::RateLimited | BetaseriesError::Server(_) => {
                true
            }
            BetaseriesError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Map a Betaseries error payload to the matching variant
    pub(crate) fn from_api(code: i32, message: String) -> Self {
        match code {
            ERROR_INVALID_TOKEN => BetaseriesError::InvalidToken,
            ERROR_INVALID_API_KEY => BetaseriesError::InvalidApiKey,
            _ => BetaseriesError::Api { code, message },
        }
    }
}

/// Result type for Betaseries operations
pub type BetaseriesResult<T> = Result<T, BetaseriesError>;
