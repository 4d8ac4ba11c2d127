//! Golden scenario loader shared by the workspace's integration tests.
//!
//! Fixtures live under `test-fixtures/golden/<area>/*.json` and deserialize
//! into the typed scenarios below.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Root directory of the fixture files.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// Relative paths (from the fixture root) of every scenario in `subdir`.
pub fn scenario_paths(subdir: &str) -> Vec<String> {
    list_fixtures(subdir)
        .into_iter()
        .filter_map(|p| {
            p.file_name()
                .map(|name| format!("{subdir}/{}", name.to_string_lossy()))
        })
        .collect()
}

/// One stored embedding in an aggregation scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRecord {
    pub vector: Vec<f32>,
    pub timestamp: DateTime<Utc>,
}

/// Embedding log plus the profile it must aggregate to.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationScenario {
    pub description: String,
    pub total_users: u64,
    pub decay_coefficient: f64,
    pub records: Vec<FixtureRecord>,
    pub expected_raw: Vec<f32>,
    pub expected_normalized: Option<Vec<f32>>,
}

/// Profile vectors as they appear in ranking scenarios.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureProfile {
    pub id: String,
    pub raw: Option<Vec<f32>>,
    pub normalized: Option<Vec<f32>>,
}

/// Expected ranking entry; camelCase like the published output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedCandidate {
    pub id: String,
    pub raw_similarity: Option<f64>,
    pub normalized_similarity: Option<f64>,
    pub scaled_similarity: Option<f64>,
    pub amplified_similarity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingScenario {
    pub description: String,
    pub user: FixtureProfile,
    pub candidates: Vec<FixtureProfile>,
    pub top_k: usize,
    pub expected: Vec<ExpectedCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecayCase {
    pub total_users: u64,
    pub coefficient: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecayScenario {
    pub description: String,
    pub cases: Vec<DecayCase>,
}
