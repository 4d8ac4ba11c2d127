use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use affinity_core::config::DecayConfig;
use affinity_core::errors::AffinityResult;
use affinity_core::models::{EmbeddingRecord, UserProfile};
use affinity_core::traits::{IEmbeddingStorage, IProfileStorage, IStatsStorage};
use affinity_core::vector::{normalize, weighted_mean};
use affinity_decay::{recency_weights, PlatformScaleTracker};

/// Recomputes a user's profile from their embedding log.
pub struct EmbeddingAggregator<S>
where
    S: IEmbeddingStorage + IProfileStorage + IStatsStorage,
{
    store: Arc<S>,
    tracker: PlatformScaleTracker<S>,
    recency_rate: f64,
}

impl<S> EmbeddingAggregator<S>
where
    S: IEmbeddingStorage + IProfileStorage + IStatsStorage,
{
    pub fn new(store: Arc<S>, config: DecayConfig) -> Self {
        let recency_rate = config.recency_rate;
        Self {
            tracker: PlatformScaleTracker::new(Arc::clone(&store), config),
            store,
            recency_rate,
        }
    }

    /// Rebuild `{rawAverage, normalizedAverage, lastUpdate}` for `user_id`.
    ///
    /// Returns `None` without touching the stored profile when the user has
    /// no embedding records.
    pub fn recompute_profile(&self, user_id: &str) -> AffinityResult<Option<UserProfile>> {
        let records = self.store.list_embeddings(user_id)?;
        if records.is_empty() {
            debug!(user_id, "no embeddings, profile left unchanged");
            return Ok(None);
        }

        let records = newest_first(records);
        let expected_len = records[0].vector.len();
        let total = records.len();
        let usable: Vec<&[f32]> = records
            .iter()
            .filter(|r| r.vector.len() == expected_len)
            .map(|r| r.vector.as_slice())
            .collect();
        if usable.len() < total {
            warn!(
                user_id,
                skipped = total - usable.len(),
                expected_len,
                "skipping embeddings with mismatched dimensions"
            );
        }

        let coefficient = self.tracker.decay_coefficient();
        let weights = recency_weights(coefficient, usable.len(), self.recency_rate);
        let Some(raw_average) = weighted_mean(&usable, &weights) else {
            warn!(user_id, "weighted mean undefined, profile left unchanged");
            return Ok(None);
        };
        let normalized_average = normalize(&raw_average);

        let profile = UserProfile {
            id: user_id.to_string(),
            raw_average: Some(raw_average),
            normalized_average,
            last_update: Some(Utc::now()),
        };
        self.store.save_profile(&profile)?;

        info!(
            user_id,
            records = usable.len(),
            decay_coefficient = coefficient,
            "profile recomputed"
        );
        Ok(Some(profile))
    }

    /// Decay coefficient the next recomputation will use.
    pub fn decay_coefficient(&self) -> f64 {
        self.tracker.decay_coefficient()
    }
}

/// Sort descending by timestamp. Records sharing a timestamp keep the later
/// append first.
fn newest_first(mut records: Vec<EmbeddingRecord>) -> Vec<EmbeddingRecord> {
    records.reverse();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}
