//! Reactive re-ranking driven by the store's profile change feed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use dashmap::{DashMap, DashSet};
use tracing::{debug, warn};

use affinity_core::config::RankingConfig;
use affinity_core::errors::AffinityResult;
use affinity_core::models::{ProfileChange, RankedCandidate};
use affinity_core::traits::{IProfileChangeFeed, IProfileStorage};
use affinity_observability::tracing_setup::events;

use crate::ranker::SimilarityRanker;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct WatcherState<S> {
    store: Arc<S>,
    ranker: SimilarityRanker,
    changes: Receiver<ProfileChange>,
    watched: DashSet<String>,
    rankings: DashMap<String, Vec<RankedCandidate>>,
    stop: AtomicBool,
}

impl<S: IProfileStorage> WatcherState<S> {
    /// Re-rank every watched user from one profile snapshot.
    fn refresh_all(&self) -> AffinityResult<usize> {
        let watched: Vec<String> = self.watched.iter().map(|u| u.key().clone()).collect();
        if watched.is_empty() {
            return Ok(0);
        }
        let profiles = self.store.list_profiles()?;
        for user_id in &watched {
            let ranking = self.ranker.rank_candidates(user_id, &profiles);
            events::rankings_published(user_id, ranking.len());
            self.rankings.insert(user_id.clone(), ranking);
        }
        Ok(watched.len())
    }

    /// Drain queued changes. Returns how many were pending.
    fn drain(&self) -> usize {
        self.changes.try_iter().count()
    }
}

/// Keeps rankings for a set of interested users up to date.
///
/// Bursts of change events collapse into a single refresh: one snapshot of
/// all profiles, one re-rank per watched user. Rankings are readable from
/// any thread through [`RankingWatcher::rankings`].
pub struct RankingWatcher<S: IProfileStorage + IProfileChangeFeed + 'static> {
    state: Arc<WatcherState<S>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<S: IProfileStorage + IProfileChangeFeed + 'static> RankingWatcher<S> {
    pub fn new(store: Arc<S>, config: RankingConfig) -> Self {
        let changes = store.subscribe();
        Self {
            state: Arc::new(WatcherState {
                store,
                ranker: SimilarityRanker::new(config),
                changes,
                watched: DashSet::new(),
                rankings: DashMap::new(),
                stop: AtomicBool::new(false),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Start tracking `user_id` and publish its current ranking.
    pub fn watch(&self, user_id: &str) -> AffinityResult<Vec<RankedCandidate>> {
        self.state.watched.insert(user_id.to_string());
        let profiles = self.state.store.list_profiles()?;
        let ranking = self.state.ranker.rank_candidates(user_id, &profiles);
        self.state
            .rankings
            .insert(user_id.to_string(), ranking.clone());
        events::rankings_published(user_id, ranking.len());
        Ok(ranking)
    }

    pub fn unwatch(&self, user_id: &str) {
        self.state.watched.remove(user_id);
        self.state.rankings.remove(user_id);
    }

    pub fn is_watching(&self, user_id: &str) -> bool {
        self.state.watched.contains(user_id)
    }

    /// Latest published ranking for a watched user.
    pub fn rankings(&self, user_id: &str) -> Option<Vec<RankedCandidate>> {
        self.state.rankings.get(user_id).map(|r| r.value().clone())
    }

    /// Consume queued change events and refresh once if there were any.
    /// Returns the number of users re-ranked.
    pub fn process_pending(&self) -> AffinityResult<usize> {
        let pending = self.state.drain();
        if pending == 0 {
            return Ok(0);
        }
        debug!(pending, "profile changes coalesced");
        self.state.refresh_all()
    }

    /// Refresh on a background thread until [`RankingWatcher::stop`] is called.
    /// Calling `start` on a running watcher does nothing.
    pub fn start(&self) {
        let mut worker = self.lock_worker();
        if worker.is_some() {
            return;
        }
        self.state.stop.store(false, Ordering::SeqCst);
        let state = Arc::clone(&self.state);
        *worker = Some(std::thread::spawn(move || run_loop(&state)));
    }

    /// Signal the background thread and wait for it to exit.
    pub fn stop(&self) {
        self.state.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.lock_worker().take() {
            if handle.join().is_err() {
                warn!("ranking watcher thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_worker().is_some()
    }

    fn lock_worker(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: IProfileStorage + IProfileChangeFeed + 'static> Drop for RankingWatcher<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop<S: IProfileStorage>(state: &WatcherState<S>) {
    while !state.stop.load(Ordering::SeqCst) {
        match state.changes.recv_timeout(POLL_INTERVAL) {
            Ok(_) => {
                let coalesced = 1 + state.drain();
                debug!(coalesced, "profile changes received");
                if let Err(e) = state.refresh_all() {
                    warn!(error = %e, "ranking refresh failed");
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
