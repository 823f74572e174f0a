//! Persistence stage
//!
//! Single sequential consumer of the update queue. A failed write is logged
//! and the item skipped.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::models::UpdateTask;
use crate::queue::QueueReceiver;
use crate::traits::EpisodeStore;

/// Stage name used in logs
pub const STAGE: &str = "update_episode";

/// Counters reported when the stage stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub persisted: usize,
    pub failed: usize,
}

/// Persist outcomes until the update queue is closed and drained
pub async fn run(mut updates: QueueReceiver<UpdateTask>, store: Arc<dyn EpisodeStore>) -> UpdateSummary {
    info!("Update stage started");
    let mut summary = UpdateSummary::default();

    while let Some(task) = updates.recv().await {
        if persist_one(store.as_ref(), &task).await {
            summary.persisted += 1;
        } else {
            summary.failed += 1;
        }
    }

    info!(
        persisted = summary.persisted,
        failed = summary.failed,
        "Update stage stopped"
    );
    summary
}

#[instrument(skip_all, fields(episode_id = task.episode.id, found = task.outcome.is_found()))]
async fn persist_one(store: &dyn EpisodeStore, task: &UpdateTask) -> bool {
    match store.persist(&task.episode, &task.outcome).await {
        Ok(()) => {
            debug!("Episode updated");
            true
        }
        Err(e) => {
            e.log(STAGE);
            false
        }
    }
}
