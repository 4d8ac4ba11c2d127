use serde::{Deserialize, Serialize};

use super::defaults;

/// Similarity ranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Number of candidates returned.
    pub top_k: usize,
    /// Normalized similarity mapped to a scaled score of 0.
    pub midpoint: f64,
    /// Steepness of the logistic amplification curve.
    pub amplification_steepness: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::DEFAULT_TOP_K,
            midpoint: defaults::DEFAULT_SIMILARITY_MIDPOINT,
            amplification_steepness: defaults::DEFAULT_AMPLIFICATION_STEEPNESS,
        }
    }
}
