use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Process-wide platform statistics singleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: u64,
    /// Always in (0, 1].
    #[serde(rename = "recencyImportance")]
    pub decay_coefficient: f64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for PlatformStats {
    /// Value reported before the first registration.
    fn default() -> Self {
        Self {
            total_users: 0,
            decay_coefficient: 1.0,
            last_updated: None,
        }
    }
}

/// Stats together with the row version used for compare-and-swap.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedStats {
    pub stats: PlatformStats,
    pub version: u64,
}
