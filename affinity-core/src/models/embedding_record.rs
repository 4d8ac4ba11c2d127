use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One per-cycle embedding. Append-only per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingRecord {
    #[serde(rename = "embedding")]
    pub vector: Vec<f32>,
    pub timestamp: DateTime<Utc>,
    /// Path of the analysis document this embedding came from.
    #[serde(rename = "analysisPath")]
    pub analysis_ref: String,
}
