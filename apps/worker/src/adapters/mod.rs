//! Collaborators backed by external services
//!
//! - [`BetaseriesEpisodeSource`] - discovers episodes from followed shows
//! - [`TorrentIndexSearchProvider`] - finds a magnet link per episode

mod betaseries;
mod torrent_index;

pub use betaseries::BetaseriesEpisodeSource;
pub use torrent_index::TorrentIndexSearchProvider;
