use serde::{Deserialize, Serialize};

use super::defaults;

/// Analysis provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Provider name: "api" or "local".
    pub provider: String,
    /// Base URL of an OpenAI-compatible API.
    pub endpoint: String,
    pub chat_model: String,
    pub embedding_model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Embedding dimensionality D, fixed platform-wide.
    pub dimensions: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    /// Attempts per analysis cycle before the cycle is skipped.
    pub max_attempts: u32,
    /// Base delay for exponential backoff between attempts.
    pub retry_backoff_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_ANALYSIS_PROVIDER.to_string(),
            endpoint: defaults::DEFAULT_ANALYSIS_ENDPOINT.to_string(),
            chat_model: defaults::DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            temperature: defaults::DEFAULT_ANALYSIS_TEMPERATURE,
            max_tokens: defaults::DEFAULT_ANALYSIS_MAX_TOKENS,
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            retry_backoff_ms: defaults::DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}
