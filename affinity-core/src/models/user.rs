use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered account owning a message log, an embedding log, and a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_sign_in: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            display_name: None,
            email: None,
            created_at: now,
            last_sign_in: now,
        }
    }
}

/// Aggregated profile vectors for one user.
///
/// `normalized_average` is unit-norm, or `None` iff `raw_average` is
/// `None` or the zero vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(rename = "mainEmbedding")]
    pub raw_average: Option<Vec<f32>>,
    #[serde(rename = "normalizedEmbedding")]
    pub normalized_average: Option<Vec<f32>>,
    #[serde(rename = "lastEmbeddingUpdate")]
    pub last_update: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Profile as created at registration, before any analysis.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_average: None,
            normalized_average: None,
            last_update: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_average.is_none()
    }
}
