//! Mock collaborators for worker integration tests
//!
//! Every mock records what it was asked to do so tests can assert on
//! call counts and ordering without touching a database or the network.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use showrss_worker::{
    Episode, EpisodeSource, EpisodeStore, SearchOutcome, SearchProvider, ShowTracking,
    WorkerError, WorkerResult,
};
use showrss_worker::models::TrackedUser;
use tokio::sync::Semaphore;

/// Closed gate that tests open with [`Gate::open`]
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    pub fn closed() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    /// Let `n` waiting (or future) calls through
    pub fn release(&self, n: usize) {
        self.0.add_permits(n);
    }

    /// Let every call through from now on
    pub fn open(&self) {
        self.0.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.0.acquire().await {
            permit.forget();
        }
    }
}

/// Episode source answering from a script, then with empty lists
#[derive(Default)]
pub struct MockEpisodeSource {
    script: Mutex<VecDeque<Result<Vec<Episode>, String>>>,
    calls: AtomicUsize,
}

impl MockEpisodeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful enumeration
    pub fn then_episodes(self, episodes: Vec<Episode>) -> Self {
        self.script.lock().unwrap().push_back(Ok(episodes));
        self
    }

    /// Queue a failed enumeration
    pub fn then_failure(self, message: &str) -> Self {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EpisodeSource for MockEpisodeSource {
    async fn episodes_needing_search(&self) -> WorkerResult<Vec<Episode>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(episodes)) => Ok(episodes),
            Some(Err(message)) => Err(WorkerError::Betaseries(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Search provider with per-episode outcomes and failures
pub struct MockSearchProvider {
    outcomes: Mutex<HashMap<i64, SearchOutcome>>,
    failing: Mutex<HashSet<i64>>,
    gate: Option<Gate>,
    calls: Mutex<Vec<i64>>,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl MockSearchProvider {
    /// Every episode is `NotFound` unless configured otherwise
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            gate: None,
            calls: Mutex::new(Vec::new()),
            running: AtomicUsize::new(0),
            max_running: AtomicUsize::new(0),
        }
    }

    pub fn with_outcome(self, episode_id: i64, outcome: SearchOutcome) -> Self {
        self.outcomes.lock().unwrap().insert(episode_id, outcome);
        self
    }

    pub fn failing_for(self, episode_id: i64) -> Self {
        self.failing.lock().unwrap().insert(episode_id);
        self
    }

    /// Hold every search until the gate lets it through
    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Searches currently inside `search`
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Highest number of searches observed running at once
    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, episode: &Episode) -> WorkerResult<SearchOutcome> {
        self.calls.lock().unwrap().push(episode.id);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.pass().await;
        } else {
            tokio::task::yield_now().await;
        }

        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.failing.lock().unwrap().contains(&episode.id) {
            return Err(WorkerError::TorrentIndex(format!(
                "index unavailable for {}",
                episode.id
            )));
        }

        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .get(&episode.id)
            .cloned()
            .unwrap_or(SearchOutcome::NotFound))
    }
}

/// Store that records every persisted outcome in order
pub struct RecordingStore {
    persisted: Mutex<Vec<(Episode, SearchOutcome)>>,
    failing: Mutex<HashSet<i64>>,
    gate: Option<Gate>,
    attempts: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            persisted: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            gate: None,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(self, episode_id: i64) -> Self {
        self.failing.lock().unwrap().insert(episode_id);
        self
    }

    /// Hold every write until the gate lets it through
    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn persisted(&self) -> Vec<(Episode, SearchOutcome)> {
        self.persisted.lock().unwrap().clone()
    }

    pub fn persisted_ids(&self) -> Vec<i64> {
        self.persisted.lock().unwrap().iter().map(|(e, _)| e.id).collect()
    }

    pub fn persisted_count(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }

    /// Calls to `persist`, including failed and still-blocked ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn outcome_for(&self, episode_id: i64) -> Option<SearchOutcome> {
        self.persisted
            .lock()
            .unwrap()
            .iter()
            .find(|(e, _)| e.id == episode_id)
            .map(|(_, o)| o.clone())
    }
}

#[async_trait]
impl EpisodeStore for RecordingStore {
    async fn persist(&self, episode: &Episode, outcome: &SearchOutcome) -> WorkerResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        if self.failing.lock().unwrap().contains(&episode.id) {
            return Err(WorkerError::Database(sqlx::Error::PoolTimedOut));
        }

        self.persisted
            .lock()
            .unwrap()
            .push((episode.clone(), outcome.clone()));
        Ok(())
    }
}

/// In-memory show tracking for adapter tests
#[derive(Default)]
pub struct InMemoryTracking {
    users: Mutex<Vec<TrackedUser>>,
    links: Mutex<HashMap<String, Vec<i64>>>,
    found: Mutex<HashSet<i64>>,
    fail_users: bool,
}

impl InMemoryTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, username: &str, token: &str) -> Self {
        self.users.lock().unwrap().push(TrackedUser {
            username: username.to_string(),
            betaseries_token: token.to_string(),
        });
        self
    }

    pub fn with_found(self, episode_id: i64) -> Self {
        self.found.lock().unwrap().insert(episode_id);
        self
    }

    /// Make `tracked_users` fail
    pub fn unavailable(mut self) -> Self {
        self.fail_users = true;
        self
    }

    pub fn linked(&self, username: &str) -> Vec<i64> {
        self.links
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ShowTracking for InMemoryTracking {
    async fn tracked_users(&self) -> WorkerResult<Vec<TrackedUser>> {
        if self.fail_users {
            return Err(WorkerError::DatabaseUnavailable);
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn link_user_episodes(&self, username: &str, episodes: &[Episode]) -> WorkerResult<()> {
        let mut links = self.links.lock().unwrap();
        let entry = links.entry(username.to_string()).or_default();
        for episode in episodes {
            if !entry.contains(&episode.id) {
                entry.push(episode.id);
            }
        }
        Ok(())
    }

    async fn found_episode_ids(&self, episode_ids: &[i64]) -> WorkerResult<Vec<i64>> {
        let found = self.found.lock().unwrap();
        Ok(episode_ids
            .iter()
            .copied()
            .filter(|id| found.contains(id))
            .collect())
    }
}
