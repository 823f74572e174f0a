//! Betaseries API client for showrss
//!
//! This crate provides a client for the Betaseries show-tracking API. The
//! service only needs one capability from it: listing the episodes a user
//! follows but has not watched yet.
//!
//! # Example
//!
//! ```rust,no_run
//! use showrss_betaseries_client::BetaseriesClient;
//! use showrss_shared_config::BetaseriesConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BetaseriesConfig::new("https://api.betaseries.com", "your_api_key");
//! let client = BetaseriesClient::new(&config)?;
//!
//! for episode in client.unseen_episodes("user_access_token").await? {
//!     println!("{} {}", episode.show_title, episode.code);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `BETASERIES_KEY`: application API key (required)
//! - `BETASERIES_URL`: API base URL (default: https://api.betaseries.com)

mod client;
mod error;
mod models;

pub use client::BetaseriesClient;
pub use error::{BetaseriesError, BetaseriesResult};
pub use models::UnseenEpisode;
