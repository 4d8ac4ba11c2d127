use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use affinity_core::config::DecayConfig;
use affinity_core::errors::{AffinityError, AffinityResult};
use affinity_core::models::PlatformStats;
use affinity_core::traits::IStatsStorage;

use crate::formula::decay_coefficient;

const STATS_RESOURCE: &str = "platform_stats";

/// Tracks registered users and the derived decay coefficient.
pub struct PlatformScaleTracker<S: IStatsStorage> {
    store: Arc<S>,
    config: DecayConfig,
}

impl<S: IStatsStorage> PlatformScaleTracker<S> {
    pub fn new(store: Arc<S>, config: DecayConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &DecayConfig {
        &self.config
    }

    /// Atomically add one user and recompute the decay coefficient.
    ///
    /// Optimistic concurrency: read the versioned singleton, compute, write
    /// conditionally, retry on conflict. Gives up with
    /// `TransactionConflict` after `max_transaction_retries` attempts.
    pub fn increment_total_users(&self) -> AffinityResult<PlatformStats> {
        let attempts = self.config.max_transaction_retries.max(1);
        for attempt in 1..=attempts {
            let current = self.store.read_stats()?;
            let (total_users, expected_version) = match &current {
                Some(v) => (v.stats.total_users, Some(v.version)),
                None => (0, None),
            };

            let total_users = total_users + 1;
            let next = PlatformStats {
                total_users,
                decay_coefficient: decay_coefficient(total_users, &self.config),
                last_updated: Some(Utc::now()),
            };

            if self.store.compare_and_swap_stats(expected_version, &next)? {
                info!(
                    total_users,
                    decay_coefficient = next.decay_coefficient,
                    attempt,
                    "platform stats incremented"
                );
                return Ok(next);
            }
            debug!(attempt, "platform stats write conflict, retrying");
        }

        warn!(attempts, "platform stats increment abandoned");
        Err(AffinityError::TransactionConflict {
            resource: STATS_RESOURCE.to_string(),
            attempts,
        })
    }

    /// Current stats, or `{0, 1}` if never initialized. Never fails: read
    /// errors are logged and reported as the uninitialized value.
    pub fn get_platform_stats(&self) -> PlatformStats {
        match self.store.read_stats() {
            Ok(Some(versioned)) => versioned.stats,
            Ok(None) => PlatformStats::default(),
            Err(e) => {
                warn!(error = %e, "platform stats unreadable, using defaults");
                PlatformStats::default()
            }
        }
    }

    /// Shortcut for the aggregator.
    pub fn decay_coefficient(&self) -> f64 {
        self.get_platform_stats().decay_coefficient
    }
}
