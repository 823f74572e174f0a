//! Mock collaborators for API integration tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use showrss_worker::{
    Episode, EpisodeCatalog, EpisodeSource, EpisodeStore, SearchOutcome, SearchProvider,
    StoredEpisode, WorkerError, WorkerResult,
};
use tokio::sync::Semaphore;

/// Holds callers until released
pub struct Gate(Semaphore);

impl Gate {
    pub fn closed() -> Self {
        Self(Semaphore::new(0))
    }

    pub fn open(&self) {
        self.0.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.0.acquire().await {
            permit.forget();
        }
    }
}

/// Returns the scripted episodes on the first cycle, nothing afterwards
pub struct ScriptedSource {
    episodes: Mutex<Option<Vec<Episode>>>,
    gate: Option<Gate>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(episodes: Vec<Episode>) -> Self {
        Self {
            episodes: Mutex::new(Some(episodes)),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Hold every enumeration until the gate opens
    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn open(&self) {
        if let Some(gate) = &self.gate {
            gate.open();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EpisodeSource for ScriptedSource {
    async fn episodes_needing_search(&self) -> WorkerResult<Vec<Episode>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        Ok(self.episodes.lock().unwrap().take().unwrap_or_default())
    }
}

/// Finds nothing, immediately
pub struct NothingFound;

#[async_trait]
impl SearchProvider for NothingFound {
    async fn search(&self, _episode: &Episode) -> WorkerResult<SearchOutcome> {
        Ok(SearchOutcome::NotFound)
    }
}

/// Store whose writes block until its gate opens
pub struct BlockingStore {
    gate: Gate,
    attempts: AtomicUsize,
    persisted: AtomicUsize,
}

impl BlockingStore {
    pub fn new() -> Self {
        Self {
            gate: Gate::closed(),
            attempts: AtomicUsize::new(0),
            persisted: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn persisted(&self) -> usize {
        self.persisted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EpisodeStore for BlockingStore {
    async fn persist(&self, _episode: &Episode, _outcome: &SearchOutcome) -> WorkerResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        self.persisted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Store that accepts every write
pub struct NullStore;

#[async_trait]
impl EpisodeStore for NullStore {
    async fn persist(&self, _episode: &Episode, _outcome: &SearchOutcome) -> WorkerResult<()> {
        Ok(())
    }
}

/// Per-user episode listings held in memory
#[derive(Default)]
pub struct InMemoryCatalog {
    users: HashMap<String, Vec<StoredEpisode>>,
    unavailable: bool,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: &str, episodes: Vec<StoredEpisode>) -> Self {
        self.users.insert(username.to_string(), episodes);
        self
    }

    /// Make every lookup fail as if the pool were exhausted
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }
}

#[async_trait]
impl EpisodeCatalog for InMemoryCatalog {
    async fn user_episodes(&self, username: &str) -> WorkerResult<Option<Vec<StoredEpisode>>> {
        if self.unavailable {
            return Err(WorkerError::DatabaseUnavailable);
        }
        Ok(self.users.get(username).cloned())
    }
}
