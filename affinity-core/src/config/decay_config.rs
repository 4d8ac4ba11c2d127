use serde::{Deserialize, Serialize};

use super::defaults;

/// Decay subsystem configuration.
///
/// `decay_coefficient = exp(-scale_factor * log10(total_users)^scale_exponent)`
/// and `weight_i = exp(-decay_coefficient * i * recency_rate)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    pub scale_factor: f64,
    pub scale_exponent: f64,
    pub recency_rate: f64,
    /// Optimistic retries for the platform stats transaction.
    pub max_transaction_retries: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            scale_factor: defaults::DEFAULT_SCALE_FACTOR,
            scale_exponent: defaults::DEFAULT_SCALE_EXPONENT,
            recency_rate: defaults::DEFAULT_RECENCY_RATE,
            max_transaction_retries: defaults::DEFAULT_MAX_TRANSACTION_RETRIES,
        }
    }
}
