//! Betaseries API response models

use serde::{Deserialize, Serialize};

/// An episode a member follows but has not watched yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnseenEpisode {
    /// Betaseries episode ID
    pub id: i64,
    /// Betaseries show ID
    pub show_id: i64,
    /// Show title (e.g., "The Expanse")
    pub show_title: String,
    /// Episode title
    pub title: String,
    /// Season number
    pub season: i32,
    /// Episode number within the season
    pub episode: i32,
    /// Episode code (e.g., "S02E05")
    pub code: String,
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct EpisodesListResponse {
    #[serde(default)]
    pub shows: Vec<RawShow>,
    #[serde(default)]
    pub errors: Vec<RawApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawShow {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub unseen: Vec<RawEpisode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEpisode {
    pub id: i64,
    pub title: String,
    pub season: i32,
    pub episode: i32,
    #[serde(default)]
    pub code: Option<String>,
}

impl RawEpisode {
    pub(crate) fn into_unseen(self, show: &RawShow) -> UnseenEpisode {
        let code = self
            .code
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| format!("S{:02}E{:02}", self.season, self.episode));

        UnseenEpisode {
            id: self.id,
            show_id: show.id,
            show_title: show.title.clone(),
            title: self.title,
            season: self.season,
            episode: self.episode,
            code,
        }
    }
}

/// Betaseries API error entry
#[derive(Debug, Deserialize)]
pub(crate) struct RawApiError {
    pub code: i32,
    pub text: String,
}

/// Error-only payload, used when the success shape does not parse
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<RawApiError>,
}
