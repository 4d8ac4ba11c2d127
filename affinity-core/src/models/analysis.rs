use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;
use crate::constants::{ANALYSIS_COLLECTION, USERS_COLLECTION};

/// Emitted by the retention manager when a cycle boundary is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub user_id: String,
    /// The most recent messages, oldest first.
    pub messages: Vec<Message>,
}

/// What an analysis provider returns for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub analysis: String,
    pub embedding: Vec<f32>,
}

/// Persisted analysis document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub analysis: String,
    pub messages: Vec<Message>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Document path referenced by the embedding produced from this analysis.
    pub fn reference(&self, user_id: &str) -> String {
        format!(
            "{USERS_COLLECTION}/{user_id}/{ANALYSIS_COLLECTION}/{}",
            self.id
        )
    }
}
