//! Error types for the torrent index client

use thiserror::Error;

/// Errors that can occur when querying the torrent index
#[derive(Error, Debug)]
pub enum TorrentIndexError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to deserialize JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Index answered with a non-success status
    #[error("Torrent index error (HTTP {status}): {body}")]
    ApiError { status: u16, body: String },

    /// Query was empty after trimming
    #[error("Search query cannot be empty")]
    EmptyQuery,

    /// Request timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection refused (index unreachable)
    #[error("Connection refused. Is the torrent index reachable at {0}?")]
    ConnectionRefused(String),

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed. Last error: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl TorrentIndexError {
    /// Check if this error is retryable (transient)
    pub fn is_retryable(&self) -> bool {
        match self {
            TorrentIndexError::Timeout(_) | TorrentIndexError::ConnectionRefused(_) => true,
            TorrentIndexError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            TorrentIndexError::ApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type for torrent index operations
pub type TorrentIndexResult<T> = Result<T, TorrentIndexError>;
