//! Layered configuration loaded from TOML. Every section falls back to
//! the values in [`defaults`] when omitted.

pub mod analysis_config;
pub mod decay_config;
pub mod defaults;
pub mod observability_config;
pub mod ranking_config;
pub mod retention_config;
pub mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use analysis_config::AnalysisConfig;
pub use decay_config::DecayConfig;
pub use observability_config::ObservabilityConfig;
pub use ranking_config::RankingConfig;
pub use retention_config::RetentionConfig;
pub use storage_config::StorageConfig;

use crate::errors::{AffinityResult, ConfigError};

/// Top-level configuration for the whole engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityConfig {
    pub storage: StorageConfig,
    pub retention: RetentionConfig,
    pub decay: DecayConfig,
    pub analysis: AnalysisConfig,
    pub ranking: RankingConfig,
    pub observability: ObservabilityConfig,
}

impl AffinityConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> AffinityResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: &Path) -> AffinityResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Reject values the engine cannot operate with.
    pub fn validate(&self) -> AffinityResult<()> {
        let retention = &self.retention;
        if retention.cycle_length == 0 {
            return Err(invalid("retention.cycle_length", "must be at least 1"));
        }
        if retention.capacity == 0 {
            return Err(invalid("retention.capacity", "must be at least 1"));
        }
        if retention.capacity < retention.cycle_length {
            return Err(invalid(
                "retention.capacity",
                "must be at least retention.cycle_length",
            ));
        }
        if self.analysis.dimensions == 0 {
            return Err(invalid("analysis.dimensions", "must be at least 1"));
        }
        if self.analysis.max_attempts == 0 {
            return Err(invalid("analysis.max_attempts", "must be at least 1"));
        }
        if !matches!(self.analysis.provider.as_str(), "api" | "local") {
            return Err(invalid(
                "analysis.provider",
                &format!("unknown provider '{}'", self.analysis.provider),
            ));
        }
        if self.ranking.top_k == 0 {
            return Err(invalid("ranking.top_k", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.ranking.midpoint) {
            return Err(invalid("ranking.midpoint", "must lie in [0, 1)"));
        }
        if self.decay.recency_rate < 0.0 || self.decay.scale_factor < 0.0 {
            return Err(invalid("decay", "rates must be non-negative"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::errors::AffinityError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
