use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use affinity_core::config::RankingConfig;
use affinity_core::errors::{AffinityError, AffinityResult};
use affinity_core::models::{RankedCandidate, UserProfile};
use affinity_core::traits::IProfileStorage;

use crate::similarity::score_candidate;

/// Descending by amplified similarity; a null score sorts after every number.
pub fn compare_amplified_desc(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    match (a.amplified_similarity, b.amplified_similarity) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub struct SimilarityRanker {
    config: RankingConfig,
}

impl SimilarityRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank `profiles` for `user_id`.
    ///
    /// The requester's own profile is looked up in `profiles` and excluded
    /// from the result, as is every profile without a normalized average.
    /// Returns an empty list when the requester has no normalized average.
    pub fn rank_candidates(&self, user_id: &str, profiles: &[UserProfile]) -> Vec<RankedCandidate> {
        let Some(user) = profiles.iter().find(|p| p.id == user_id) else {
            return Vec::new();
        };
        self.rank_against(user, profiles)
    }

    /// Rank `candidates` against an explicit requester profile.
    pub fn rank_against(&self, user: &UserProfile, candidates: &[UserProfile]) -> Vec<RankedCandidate> {
        if user.normalized_average.is_none() {
            debug!(user_id = %user.id, "requester has no profile vector, nothing to rank");
            return Vec::new();
        }

        let mut ranked: Vec<RankedCandidate> = candidates
            .par_iter()
            .filter(|c| c.id != user.id && c.normalized_average.is_some())
            .map(|c| score_candidate(user, c, &self.config))
            .collect();

        ranked.sort_by(compare_amplified_desc);
        ranked.truncate(self.config.top_k);
        ranked
    }

    /// Load every profile from `store` and rank them for `user_id`.
    pub fn rank_for<S: IProfileStorage + ?Sized>(
        &self,
        store: &S,
        user_id: &str,
    ) -> AffinityResult<Vec<RankedCandidate>> {
        let profiles = store.list_profiles()?;
        let Some(user) = profiles.iter().find(|p| p.id == user_id) else {
            return Err(AffinityError::UserNotFound {
                id: user_id.to_string(),
            });
        };
        Ok(self.rank_against(user, &profiles))
    }
}
