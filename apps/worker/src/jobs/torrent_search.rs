//! Search stage
//!
//! Drains the search queue and runs one search task per episode. Fan-out is
//! unbounded unless a worker limit is configured, in which case a semaphore
//! permit is taken before the next episode is pulled from the queue.
//!
//! A failed search is logged and the episode dropped; nothing is retried.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use crate::error::WorkerError;
use crate::models::{Episode, UpdateTask};
use crate::queue::{QueueReceiver, QueueSender};
use crate::traits::SearchProvider;

/// Stage name used in logs
pub const STAGE: &str = "torrent_search";

/// Search stage state
pub struct SearchStage {
    provider: Arc<dyn SearchProvider>,
    updates: QueueSender<UpdateTask>,
    limit: Option<Arc<Semaphore>>,
    in_flight: Arc<AtomicUsize>,
}

impl SearchStage {
    pub fn new(provider: Arc<dyn SearchProvider>, updates: QueueSender<UpdateTask>) -> Self {
        Self {
            provider,
            updates,
            limit: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Cap the number of concurrent searches
    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        self.limit = max_workers
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n)));
        self
    }

    /// Share an in-flight counter with a monitor
    pub fn with_in_flight(mut self, in_flight: Arc<AtomicUsize>) -> Self {
        self.in_flight = in_flight;
        self
    }

    /// Searches currently running
    pub fn in_flight(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.in_flight)
    }

    /// Run until the search queue is closed and every started search is done
    pub async fn run(self, mut episodes: QueueReceiver<Episode>) {
        info!(
            max_workers = self.limit.as_ref().map(|s| s.available_permits()),
            "Search stage started"
        );

        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    reap(joined);
                }
                next = next_search(&mut episodes, self.limit.as_ref()) => {
                    let Some((episode, permit)) = next else {
                        break;
                    };

                    let guard = InFlight::enter(&self.in_flight);
                    let provider = Arc::clone(&self.provider);
                    let updates = self.updates.clone();
                    tasks.spawn(async move {
                        search_one(episode, provider, updates).await;
                        drop(guard);
                        drop(permit);
                    });
                }
            }
        }

        debug!(remaining = tasks.len(), "Search queue closed, waiting for running searches");
        while let Some(joined) = tasks.join_next().await {
            reap(joined);
        }

        info!("Search stage stopped");
    }
}

/// Take a worker slot when limited, then the next episode
async fn next_search(
    episodes: &mut QueueReceiver<Episode>,
    limit: Option<&Arc<Semaphore>>,
) -> Option<(Episode, Option<OwnedSemaphorePermit>)> {
    let permit = match limit {
        Some(semaphore) => Some(Arc::clone(semaphore).acquire_owned().await.ok()?),
        None => None,
    };
    let episode = episodes.recv().await?;
    Some((episode, permit))
}

fn reap(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "Search task panicked");
        }
    }
}

#[instrument(skip_all, fields(episode_id = episode.id, code = %episode.code))]
async fn search_one(
    episode: Episode,
    provider: Arc<dyn SearchProvider>,
    updates: QueueSender<UpdateTask>,
) {
    let outcome = match provider.search(&episode).await {
        Ok(outcome) => outcome,
        Err(e) => {
            e.log(STAGE);
            return;
        }
    };

    debug!(found = outcome.is_found(), "Search finished");

    if let Err(e) = updates.send(UpdateTask { episode, outcome }).await {
        WorkerError::from(e).log(STAGE);
    }
}

/// Decrements the in-flight counter on drop, including on panic
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
