use serde::{Deserialize, Serialize};

use super::defaults;

/// Message retention configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Maximum number of messages kept per user.
    pub capacity: usize,
    /// Every time the retained count reaches a multiple of this, an analysis fires.
    pub cycle_length: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_RETENTION_CAPACITY,
            cycle_length: defaults::DEFAULT_CYCLE_LENGTH,
        }
    }
}
