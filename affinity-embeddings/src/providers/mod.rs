//! Provider registry.
//!
//! 1. API (OpenAI-compatible chat + embeddings, highest quality)
//! 2. Local (feature hashing, always available)

pub mod api_provider;
pub mod local_provider;

pub use api_provider::ApiAnalysisProvider;
pub use local_provider::LocalAnalysisProvider;

use affinity_core::config::AnalysisConfig;
use affinity_core::traits::IAnalysisProvider;
use tracing::{info, warn};

/// Create the configured provider, returning it boxed.
///
/// Falls back to the local provider when the API provider cannot be built
/// (missing key, runtime failure).
pub fn create_provider(config: &AnalysisConfig) -> Box<dyn IAnalysisProvider> {
    match config.provider.as_str() {
        "api" => match ApiAnalysisProvider::from_config(config) {
            Ok(p) => {
                info!(provider = "api", model = %config.chat_model, "analysis provider ready");
                Box::new(p)
            }
            Err(e) => {
                warn!(error = %e, "API provider unavailable, falling back to local");
                Box::new(LocalAnalysisProvider::new(config.dimensions))
            }
        },
        "local" => {
            info!(provider = "local", "using local analysis provider");
            Box::new(LocalAnalysisProvider::new(config.dimensions))
        }
        other => {
            warn!(provider = other, "unknown provider, using local fallback");
            Box::new(LocalAnalysisProvider::new(config.dimensions))
        }
    }
}
