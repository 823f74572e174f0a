//! showrss worker pipeline
//!
//! Periodically discovers unseen episodes of followed shows, searches a
//! torrent index for each of them and stores what it found.
//!
//! The pipeline is a chain of long-running stages connected by bounded
//! queues. See [`pipeline`] for the topology and lifecycle, and [`traits`]
//! for the collaborator seams.

pub mod adapters;
pub mod config;
pub mod error;
pub mod jobs;
pub mod models;
pub mod pipeline;
pub mod queue;
pub mod rate_limiter;
pub mod repositories;
pub mod traits;

pub use config::PipelineConfig;
pub use error::{ErrorSeverity, WorkerError, WorkerResult};
pub use models::{AdmissionToken, Episode, SearchOutcome, StoredEpisode, TokenOrigin, TorrentSource, UpdateTask};
pub use pipeline::{Pipeline, PipelineHandle, PipelineMonitor, PipelineStats};
pub use queue::{QueueClosed, QueueStats};
pub use rate_limiter::{RateLimiter, RefreshTrigger};
pub use traits::{EpisodeCatalog, EpisodeSource, EpisodeStore, SearchProvider, ShowTracking};
