//! Error handling for the showrss worker pipeline
//!
//! Every collaborator failure inside the pipeline is turned into a
//! [`WorkerError`]. Stages never propagate these across a queue boundary;
//! they call [`WorkerError::log`] and move on to the next item.

use showrss_betaseries_client::BetaseriesError;
use showrss_torrent_index_client::TorrentIndexError;
use thiserror::Error;

/// Main worker error type
#[derive(Error, Debug)]
pub enum WorkerError {
    // ========== Database Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database connection pool exhausted or closed
    #[error("database connection unavailable")]
    DatabaseUnavailable,

    // ========== Show Metadata Errors ==========
    /// Betaseries rejected a member token
    #[error("Betaseries token rejected for user '{0}'")]
    TokenRejected(String),

    /// Betaseries API error
    #[error("Betaseries error: {0}")]
    Betaseries(String),

    // ========== Torrent Search Errors ==========
    /// Torrent index request failed
    #[error("torrent index error: {0}")]
    TorrentIndex(String),

    // ========== HTTP/External Service Errors ==========
    /// External service timeout
    #[error("external service timeout: {service}")]
    ServiceTimeout { service: String },

    /// External service failed after every retry attempt
    #[error("{service} failed after {attempts} attempts: {reason}")]
    MaxRetriesExceeded {
        service: &'static str,
        attempts: u32,
        reason: String,
    },

    // ========== Pipeline Errors ==========
    /// A downstream queue was closed while sending
    #[error("{0} queue closed")]
    QueueClosed(&'static str),

    // ========== Configuration Errors ==========
    /// Missing required configuration
    #[error("missing required configuration: {0}")]
    MissingConfiguration(&'static str),
}

impl WorkerError {
    /// Check if this error is retryable
    ///
    /// The pipeline itself never retries; this only tells operators whether
    /// the next cycle is likely to succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::DatabaseUnavailable
                | Self::TorrentIndex(_)
                | Self::ServiceTimeout { .. }
                | Self::MaxRetriesExceeded { .. }
        )
    }

    /// Get a severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical errors that should alert operators
            Self::MissingConfiguration(_) | Self::DatabaseUnavailable => ErrorSeverity::Critical,

            // Errors that indicate service issues
            Self::Database(_)
            | Self::Betaseries(_)
            | Self::MaxRetriesExceeded { .. } => ErrorSeverity::Error,

            // Warnings for expected failures
            Self::ServiceTimeout { .. }
            | Self::TorrentIndex(_)
            | Self::TokenRejected(_)
            | Self::QueueClosed(_) => ErrorSeverity::Warning,
        }
    }

    /// Log the error with appropriate severity, tagged with the stage name
    pub fn log(&self, stage: &'static str) {
        match self.severity() {
            ErrorSeverity::Critical => {
                tracing::error!(
                    error = %self,
                    stage = stage,
                    retryable = self.is_retryable(),
                    "Critical worker error"
                );
            }
            ErrorSeverity::Error => {
                tracing::error!(
                    error = %self,
                    stage = stage,
                    retryable = self.is_retryable(),
                    "Worker error"
                );
            }
            ErrorSeverity::Warning => {
                tracing::warn!(
                    error = %self,
                    stage = stage,
                    retryable = self.is_retryable(),
                    "Worker warning"
                );
            }
        }
    }

    /// Map a Betaseries failure for a given user
    pub fn betaseries_for_user(username: &str, err: BetaseriesError) -> Self {
        match err {
            BetaseriesError::InvalidToken => Self::TokenRejected(username.to_string()),
            other => other.into(),
        }
    }
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical errors that should trigger alerts
    Critical,
    /// Standard errors
    Error,
    /// Warnings for expected failures
    Warning,
}

/// Result type alias for worker operations
pub type WorkerResult<T> = Result<T, WorkerError>;

// ========== Conversion Implementations ==========

impl From<BetaseriesError> for WorkerError {
    fn from(err: BetaseriesError) -> Self {
        match err {
            BetaseriesError::Timeout => Self::ServiceTimeout {
                service: "Betaseries".to_string(),
            },
            BetaseriesError::MissingApiKey | BetaseriesError::InvalidApiKey => {
                Self::MissingConfiguration("BETASERIES_KEY")
            }
            other => Self::Betaseries(other.to_string()),
        }
    }
}

impl From<TorrentIndexError> for WorkerError {
    fn from(err: TorrentIndexError) -> Self {
        match err {
            TorrentIndexError::Timeout(secs) => Self::ServiceTimeout {
                service: format!("torrent index ({}s)", secs),
            },
            TorrentIndexError::RetriesExhausted {
                attempts,
                last_error,
            } => Self::MaxRetriesExceeded {
                service: "torrent index",
                attempts,
                reason: last_error,
            },
            other => Self::TorrentIndex(other.to_string()),
        }
    }
}

impl From<crate::queue::QueueClosed> for WorkerError {
    fn from(err: crate::queue::QueueClosed) -> Self {
        Self::QueueClosed(err.0)
    }
}
