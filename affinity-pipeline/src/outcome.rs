use serde::Serialize;

use affinity_core::models::PlatformStats;

/// What the analysis stage did for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AnalysisStatus {
    /// The message did not close a cycle.
    NotDue,
    /// A new analysis and embedding were stored.
    #[serde(rename_all = "camelCase")]
    Recorded {
        analysis_ref: String,
        profile_updated: bool,
    },
    /// The cycle closed but produced no embedding. Messages are kept and
    /// the profile is untouched; the cycle is not retried later.
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub retained_count: usize,
    pub trimmed: usize,
    pub analysis: AnalysisStatus,
}

impl TurnOutcome {
    pub fn was_analyzed(&self) -> bool {
        matches!(self.analysis, AnalysisStatus::Recorded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    /// False for a repeat sign-in.
    pub created: bool,
    pub stats: PlatformStats,
}
