//! Pipeline stages
//!
//! Each stage is a long-running task reading one bounded queue:
//!
//! - `refresh` - turns admission tokens into episodes to search
//! - `torrent_search` - searches episodes concurrently
//! - `update_episode` - persists search outcomes one at a time
//!
//! A stage returns once its input queue is closed and drained.

pub mod refresh;
pub mod torrent_search;
pub mod update_episode;

pub use refresh::CycleOutcome;
pub use torrent_search::SearchStage;
