//! # affinity-observability
//!
//! Structured tracing for the engine: subscriber setup driven by
//! `AFFINITY_LOG`, span macros per operation, and structured event helpers
//! emitted at the pipeline's decision points.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, init_tracing_from_config, init_tracing_with_filter};
