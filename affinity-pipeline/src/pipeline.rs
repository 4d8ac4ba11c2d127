use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use affinity_core::config::{AffinityConfig, AnalysisConfig};
use affinity_core::errors::{AffinityError, AffinityResult, AnalysisError};
use affinity_core::models::{
    AnalysisOutput, AnalysisRecord, EmbeddingRecord, Message, PlatformStats, RankedCandidate,
    UserAccount, UserProfile,
};
use affinity_core::traits::{IAnalysisProvider, IDocumentStore};
use affinity_decay::PlatformScaleTracker;
use affinity_embeddings::{create_provider, EmbeddingAggregator};
use affinity_observability::tracing_setup::events;
use affinity_observability::{analysis_span, ranking_span, registration_span, retention_span};
use affinity_ranking::{RankingWatcher, SimilarityRanker};
use affinity_retention::RetentionManager;
use affinity_storage::StorageEngine;

use crate::outcome::{AnalysisStatus, RegistrationOutcome, TurnOutcome};

/// The engine's orchestration layer over a document store.
///
/// Mutations for one user are serialized through a per-user lock; different
/// users proceed in parallel.
pub struct AffinityPipeline<S: IDocumentStore + 'static> {
    store: Arc<S>,
    provider: Arc<dyn IAnalysisProvider>,
    retention: RetentionManager<S>,
    aggregator: EmbeddingAggregator<S>,
    tracker: PlatformScaleTracker<S>,
    ranker: SimilarityRanker,
    config: AffinityConfig,
    user_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AffinityPipeline<StorageEngine> {
    /// Open the configured SQLite store and analysis provider.
    pub fn open(config: &AffinityConfig) -> AffinityResult<Self> {
        config.validate()?;
        let store = Arc::new(StorageEngine::open_with_config(&config.storage)?);
        let provider: Arc<dyn IAnalysisProvider> = Arc::from(create_provider(&config.analysis));
        Self::new(store, provider, config.clone())
    }
}

impl<S: IDocumentStore + 'static> AffinityPipeline<S> {
    pub fn new(
        store: Arc<S>,
        provider: Arc<dyn IAnalysisProvider>,
        config: AffinityConfig,
    ) -> AffinityResult<Self> {
        config.validate()?;
        if provider.dimensions() != config.analysis.dimensions {
            return Err(AffinityError::DimensionMismatch {
                expected: config.analysis.dimensions,
                actual: provider.dimensions(),
            });
        }
        info!(
            provider = provider.name(),
            dimensions = config.analysis.dimensions,
            "affinity pipeline ready"
        );
        Ok(Self {
            retention: RetentionManager::new(Arc::clone(&store), config.retention.clone()),
            aggregator: EmbeddingAggregator::new(Arc::clone(&store), config.decay.clone()),
            tracker: PlatformScaleTracker::new(Arc::clone(&store), config.decay.clone()),
            ranker: SimilarityRanker::new(config.ranking.clone()),
            store,
            provider,
            config,
            user_locks: DashMap::new(),
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &AffinityConfig {
        &self.config
    }

    /// Register (or re-sign-in) an account.
    ///
    /// A new account gets an empty profile and bumps the platform user count;
    /// a repeat registration only refreshes the account fields. The count is
    /// bumped once per account: if the increment fails, the next registration
    /// of the same id retries it.
    pub fn register_user(&self, account: &UserAccount) -> AffinityResult<RegistrationOutcome> {
        let _span = registration_span!(account.id).entered();
        let lock = self.user_lock(&account.id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let created = self.store.upsert_user(account)?;
        if self.store.get_profile(&account.id)?.is_none() {
            self.store.save_profile(&UserProfile::empty(account.id.clone()))?;
        }

        let stats = if self.store.is_user_counted(&account.id)? {
            self.tracker.get_platform_stats()
        } else {
            let stats = self.tracker.increment_total_users()?;
            self.store.mark_user_counted(&account.id)?;
            if !created {
                info!(user_id = %account.id, "counted previously uncounted account");
            }
            stats
        };
        events::user_registered(&account.id, created, stats.total_users);
        Ok(RegistrationOutcome { created, stats })
    }

    /// Append one conversation message for `user_id` and run the analysis
    /// cycle if this message closes one.
    pub fn handle_message(&self, user_id: &str, message: Message) -> AffinityResult<TurnOutcome> {
        let _span = retention_span!(user_id).entered();
        if self.store.get_user(user_id)?.is_none() {
            return Err(AffinityError::UserNotFound {
                id: user_id.to_string(),
            });
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let appended = self.retention.append_message(user_id, message)?;
        let analysis = match appended.request {
            None => AnalysisStatus::NotDue,
            Some(request) => {
                events::analysis_cycle_triggered(
                    user_id,
                    appended.retained_count,
                    request.messages.len(),
                );
                self.run_analysis(user_id, request.messages)?
            }
        };

        Ok(TurnOutcome {
            retained_count: appended.retained_count,
            trimmed: appended.trimmed,
            analysis,
        })
    }

    /// Delete every stored message of `user_id`. The profile and embedding
    /// history are untouched.
    pub fn clear_history(&self, user_id: &str) -> AffinityResult<usize> {
        let _span = retention_span!(user_id).entered();
        if self.store.get_user(user_id)?.is_none() {
            return Err(AffinityError::UserNotFound {
                id: user_id.to_string(),
            });
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.retention.clear_history(user_id)
    }

    /// Recompute every profile that has no average yet from the stored
    /// embeddings. Returns how many profiles were filled in.
    pub fn backfill_profiles(&self) -> AffinityResult<usize> {
        let mut updated = 0;
        for user_id in self.store.list_user_ids()? {
            let needs_profile = self
                .store
                .get_profile(&user_id)?
                .map_or(true, |p| p.is_empty());
            if !needs_profile {
                continue;
            }
            let lock = self.user_lock(&user_id);
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if self.aggregator.recompute_profile(&user_id)?.is_some() {
                updated += 1;
            }
        }
        info!(updated, "profile backfill complete");
        Ok(updated)
    }

    /// Top matches for `user_id` from the current profiles.
    pub fn rankings_for(&self, user_id: &str) -> AffinityResult<Vec<RankedCandidate>> {
        let profiles = self.store.list_profiles()?;
        let _span = ranking_span!(user_id, profiles.len()).entered();
        if !profiles.iter().any(|p| p.id == user_id) {
            return Err(AffinityError::UserNotFound {
                id: user_id.to_string(),
            });
        }
        Ok(self.ranker.rank_candidates(user_id, &profiles))
    }

    /// Retained messages for `user_id`, oldest first.
    pub fn load_history(&self, user_id: &str) -> AffinityResult<Vec<Message>> {
        self.retention.load_history(user_id)
    }

    pub fn profile(&self, user_id: &str) -> AffinityResult<Option<UserProfile>> {
        self.store.get_profile(user_id)
    }

    pub fn platform_stats(&self) -> PlatformStats {
        self.tracker.get_platform_stats()
    }

    /// A watcher over this pipeline's store, configured like its ranker.
    pub fn ranking_watcher(&self) -> RankingWatcher<S> {
        RankingWatcher::new(Arc::clone(&self.store), self.config.ranking.clone())
    }

    /// Analyze, record, and aggregate. Provider exhaustion yields `Skipped`;
    /// storage failures propagate.
    fn run_analysis(&self, user_id: &str, messages: Vec<Message>) -> AffinityResult<AnalysisStatus> {
        let _span = analysis_span!(user_id, self.provider.name()).entered();
        let output = match analyze_with_retry(
            self.provider.as_ref(),
            &messages,
            &self.config.analysis,
        ) {
            Ok(output) => output,
            Err((attempts, e)) => {
                let reason = e.to_string();
                events::analysis_skipped(user_id, attempts, &reason);
                return Ok(AnalysisStatus::Skipped { reason });
            }
        };

        let record = AnalysisRecord {
            id: Uuid::new_v4().to_string(),
            analysis: output.analysis,
            messages,
            timestamp: Utc::now(),
        };
        let analysis_ref = self.store.record_analysis(user_id, &record)?;
        self.store.append_embedding(
            user_id,
            &EmbeddingRecord {
                vector: output.embedding,
                timestamp: record.timestamp,
                analysis_ref: analysis_ref.clone(),
            },
        )?;

        let profile = self.aggregator.recompute_profile(user_id)?;
        if let Some(p) = &profile {
            let records = self.store.list_embeddings(user_id)?.len();
            events::profile_recomputed(user_id, records, self.aggregator.decay_coefficient());
            debug!(user_id, has_vector = p.normalized_average.is_some(), "profile saved");
        }
        Ok(AnalysisStatus::Recorded {
            analysis_ref,
            profile_updated: profile.is_some(),
        })
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.user_locks.entry(user_id.to_string()).or_default().value())
    }
}

/// Call the provider up to `max_attempts` times with exponential backoff.
/// An embedding of the wrong length counts as a failed attempt.
fn analyze_with_retry(
    provider: &dyn IAnalysisProvider,
    messages: &[Message],
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, (u32, AffinityError)> {
    let attempts = config.max_attempts.max(1);
    let mut last_err = None;
    for attempt in 1..=attempts {
        if attempt > 1 {
            let delay = config.retry_backoff_ms.saturating_mul(1u64 << (attempt - 2).min(16));
            thread::sleep(Duration::from_millis(delay));
            debug!(attempt, "retrying analysis");
        }
        let result = provider.analyze(messages).and_then(|output| {
            if output.embedding.len() == config.dimensions {
                Ok(output)
            } else {
                Err(AnalysisError::DimensionMismatch {
                    expected: config.dimensions,
                    actual: output.embedding.len(),
                }
                .into())
            }
        });
        match result {
            Ok(output) => return Ok(output),
            Err(e) => {
                warn!(attempt, error = %e, "analysis attempt failed");
                last_err = Some(e);
            }
        }
    }
    Err((
        attempts,
        last_err.unwrap_or_else(|| {
            AnalysisError::RequestFailed {
                reason: "all attempts exhausted".to_string(),
            }
            .into()
        }),
    ))
}
