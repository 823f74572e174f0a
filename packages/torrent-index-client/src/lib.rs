//! Torrent index search client for showrss
//!
//! This crate queries an apibay-compatible index (`/q.php`) and turns its
//! results into typed torrents that can produce magnet links.
//!
//! # Thread Safety
//!
//! `TorrentIndexClient` is `Clone + Send + Sync` and can be shared across
//! the concurrent search tasks of the worker pipeline.
//!
//! # Example
//!
//! ```no_run
//! use showrss_torrent_index_client::TorrentIndexClient;
//! use showrss_shared_config::TorrentIndexConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TorrentIndexConfig::default();
//! let client = TorrentIndexClient::new(&config)?;
//!
//! for torrent in client.search("The Expanse S01E01").await? {
//!     println!("{} ({} seeders): {}", torrent.name, torrent.seeders, torrent.magnet_link());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::TorrentIndexClient;
pub use error::{TorrentIndexError, TorrentIndexResult};
pub use models::{TorrentResult, DEFAULT_TRACKERS};
