use serde::{Deserialize, Serialize};

/// One entry of a ranking. Not persisted.
///
/// `raw_similarity` and `normalized_similarity` lie in [-1, 1];
/// `scaled_similarity` and `amplified_similarity` in [0, 1]. Any of them is
/// `None` when the underlying vectors are missing or incompatible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    #[serde(rename = "id")]
    pub user_id: String,
    pub raw_similarity: Option<f64>,
    pub normalized_similarity: Option<f64>,
    pub scaled_similarity: Option<f64>,
    pub amplified_similarity: Option<f64>,
}
