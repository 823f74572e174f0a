//! Shared test utilities for the showrss workspace
//!
//! This crate provides mock implementations of the external services the
//! worker pipeline talks to, so adapters can be tested without network
//! access.
//!
//! # Mock Services
//!
//! - [`MockBetaseriesServer`] - Mock Betaseries API serving unseen episodes
//! - [`MockTorrentIndexServer`] - Mock apibay-compatible torrent index
//!
//! # Example
//!
//! ```rust,ignore
//! use showrss_test_utils::{BetaseriesShowFixture, MockBetaseriesServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let betaseries = MockBetaseriesServer::start().await;
//!     betaseries
//!         .mock_unseen_episodes("token", vec![BetaseriesShowFixture::new(1, "Dark").with_episodes(1, 2)])
//!         .await;
//!
//!     // Use betaseries.url() and betaseries.api_key() to configure your client
//! }
//! ```

mod betaseries;
mod torrent_index;

pub use betaseries::{BetaseriesEpisodeFixture, BetaseriesShowFixture, MockBetaseriesServer};
pub use torrent_index::{MockTorrentIndexServer, TorrentFixture};
