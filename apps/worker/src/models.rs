//! Values that flow through the pipeline queues
//!
//! Everything here is immutable once built and moved by value from one
//! stage to the next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An episode that needs a download source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Betaseries episode ID
    pub id: i64,
    /// Betaseries show ID
    pub show_id: i64,
    /// Show title used in search queries
    pub show_name: String,
    /// Episode title
    pub name: String,
    /// Episode code (e.g., "S03E07")
    pub code: String,
    pub season: i32,
    pub episode: i32,
}

impl Episode {
    /// Free-text query for torrent search, with an optional quality marker
    pub fn search_query(&self, quality: Option<&str>) -> String {
        match quality {
            Some(quality) => format!("{} {} {}", self.show_name, self.code, quality),
            None => format!("{} {}", self.show_name, self.code),
        }
    }
}

/// Reference to a downloadable source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentSource {
    pub magnet_link: String,
    pub name: String,
    pub seeders: u32,
}

/// Result of searching one episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found(TorrentSource),
    NotFound,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Item carried by the update queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTask {
    pub episode: Episode,
    pub outcome: SearchOutcome,
}

/// Where an admission token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrigin {
    /// Issued by the periodic refresh timer
    Timer,
    /// Injected through the HTTP boundary
    Manual,
}

impl std::fmt::Display for TokenOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timer => write!(f, "timer"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Permission to start one refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionToken {
    pub id: Uuid,
    pub origin: TokenOrigin,
    pub issued_at: DateTime<Utc>,
}

impl AdmissionToken {
    pub fn new(origin: TokenOrigin) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            issued_at: Utc::now(),
        }
    }
}

/// A user whose Betaseries account drives episode discovery
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TrackedUser {
    pub username: String,
    pub betaseries_token: String,
}

/// An episode as stored, with the latest search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoredEpisode {
    pub id: i64,
    pub show_id: i64,
    pub show_name: String,
    pub name: String,
    pub code: String,
    pub season: i32,
    pub episode: i32,
    pub found: bool,
    pub magnet_link: Option<String>,
    pub torrent_name: Option<String>,
    pub seeders: Option<i32>,
    pub last_searched_at: Option<DateTime<Utc>>,
}
