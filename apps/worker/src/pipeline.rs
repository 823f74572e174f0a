//! Pipeline assembly and lifecycle
//!
//! ```text
//! timer / manual ──> token queue ──> refresh ──> search queue ──> torrent search
//!                                                                     │
//!                          storage <── update episode <── update queue ┘
//! ```
//!
//! Stages share nothing but the bounded queues between them. Stopping is
//! either a graceful [`PipelineHandle::close`], which lets queued work
//! finish, or a lossy [`PipelineHandle::abort`], which discards it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::jobs::{refresh, update_episode, SearchStage};
use crate::models::{Episode, UpdateTask};
use crate::queue::{self, QueueGauge, QueueStats};
use crate::rate_limiter::{RateLimiter, RefreshTrigger};
use crate::traits::{EpisodeSource, EpisodeStore, SearchProvider};

/// Search queue name
pub const SEARCH_QUEUE: &str = "torrent_searches";

/// Update queue name
pub const UPDATE_QUEUE: &str = "episode_updates";

/// Builds and starts the pipeline
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Spawn the refresh timer and the three stages on the current runtime
    pub fn spawn(
        self,
        source: Arc<dyn EpisodeSource>,
        provider: Arc<dyn SearchProvider>,
        store: Arc<dyn EpisodeStore>,
    ) -> PipelineHandle {
        let config = self.config;
        let (trigger, limiter) = RateLimiter::new(config.token_capacity);
        let (search_tx, search_rx) = queue::bounded::<Episode>(SEARCH_QUEUE, config.search_queue_capacity);
        let (update_tx, update_rx) = queue::bounded::<UpdateTask>(UPDATE_QUEUE, config.update_queue_capacity);
        let in_flight = Arc::new(AtomicUsize::new(0));

        let monitor = PipelineMonitor {
            tokens: trigger.gauge(),
            searches: search_tx.gauge(),
            updates: update_tx.gauge(),
            in_flight: Arc::clone(&in_flight),
        };

        let search_stage = SearchStage::new(provider, update_tx)
            .with_max_workers(config.max_search_workers)
            .with_in_flight(in_flight);

        let stages = vec![
            Stage::new(refresh::STAGE, tokio::spawn(refresh::run(limiter, source, search_tx))),
            Stage::new(
                crate::jobs::torrent_search::STAGE,
                tokio::spawn(search_stage.run(search_rx)),
            ),
            Stage::new(
                update_episode::STAGE,
                tokio::spawn(async move {
                    update_episode::run(update_rx, store).await;
                }),
            ),
        ];

        let ticker = trigger.spawn_ticker(config.refresh_interval);

        info!(
            refresh_interval_secs = config.refresh_interval.as_secs(),
            token_capacity = config.token_capacity,
            search_queue_capacity = config.search_queue_capacity,
            update_queue_capacity = config.update_queue_capacity,
            max_search_workers = config.max_search_workers,
            "Pipeline started"
        );

        PipelineHandle {
            trigger,
            ticker,
            stages,
            monitor,
        }
    }
}

struct Stage {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Stage {
    fn new(name: &'static str, handle: JoinHandle<()>) -> Self {
        Self { name, handle }
    }
}

/// Owner of a running pipeline
pub struct PipelineHandle {
    trigger: RefreshTrigger,
    ticker: JoinHandle<()>,
    stages: Vec<Stage>,
    monitor: PipelineMonitor,
}

impl PipelineHandle {
    /// Producer handle for manual refreshes
    pub fn trigger(&self) -> RefreshTrigger {
        self.trigger.clone()
    }

    pub fn monitor(&self) -> PipelineMonitor {
        self.monitor.clone()
    }

    /// Whether any stage is still running
    pub fn is_running(&self) -> bool {
        self.stages.iter().any(|stage| !stage.handle.is_finished())
    }

    /// Stop the timer and let queued work finish
    ///
    /// Returns once every stage has stopped. Outstanding [`RefreshTrigger`]
    /// clones keep the refresh stage waiting for tokens, so drop them first.
    pub async fn close(self) -> PipelineStats {
        self.ticker.abort();
        drop(self.trigger);

        for stage in self.stages {
            if let Err(e) = stage.handle.await {
                warn!(stage = stage.name, error = %e, "Pipeline stage ended abnormally");
            } else {
                debug!(stage = stage.name, "Pipeline stage finished");
            }
        }

        let stats = self.monitor.snapshot();
        info!("Pipeline closed");
        stats
    }

    /// Stop every stage immediately
    ///
    /// Queued tokens, episodes and outcomes are discarded along with
    /// running searches. The returned stats describe what was lost.
    pub fn abort(self) -> PipelineStats {
        let stats = self.monitor.snapshot();

        self.ticker.abort();
        for stage in &self.stages {
            stage.handle.abort();
        }

        if stats.discarded_work() > 0 {
            warn!(
                pending_refreshes = stats.pending_refreshes,
                queued_searches = stats.search_queue.len,
                queued_updates = stats.update_queue.len,
                searches_in_flight = stats.searches_in_flight,
                "Pipeline aborted with unfinished work"
            );
        } else {
            info!("Pipeline aborted");
        }

        stats
    }
}

/// Read-only view of queue depths and running searches
#[derive(Debug, Clone)]
pub struct PipelineMonitor {
    tokens: QueueGauge,
    searches: QueueGauge,
    updates: QueueGauge,
    in_flight: Arc<AtomicUsize>,
}

impl PipelineMonitor {
    pub fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            pending_refreshes: self.tokens.len(),
            search_queue: self.searches.snapshot(),
            update_queue: self.updates.snapshot(),
            searches_in_flight: self.in_flight.load(Ordering::SeqCst),
        }
    }
}

/// Point-in-time pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub pending_refreshes: usize,
    pub search_queue: QueueStats,
    pub update_queue: QueueStats,
    pub searches_in_flight: usize,
}

impl PipelineStats {
    /// Work that an abort would throw away
    pub fn discarded_work(&self) -> usize {
        self.pending_refreshes
            + self.search_queue.len
            + self.update_queue.len
            + self.searches_in_flight
    }
}
