//! Tracing setup: structured JSON logging with span definitions and event types.

pub mod events;
pub mod spans;

use affinity_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the filter directive.
pub const LOG_ENV_VAR: &str = "AFFINITY_LOG";

/// Initialize the global subscriber with structured JSON output.
///
/// Respects `AFFINITY_LOG`, defaulting to `info`. Returns `false` if a
/// global subscriber was already installed.
pub fn init_tracing() -> bool {
    init_with_default("info")
}

/// Same as [`init_tracing`], but falls back to `observability.log_level`.
pub fn init_tracing_from_config(config: &ObservabilityConfig) -> bool {
    init_with_default(&config.log_level)
}

/// Initialize with an explicit filter string, ignoring the environment.
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init()
        .is_ok()
}

fn init_with_default(default_level: &str) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .try_init()
        .is_ok()
}
