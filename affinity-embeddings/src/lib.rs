//! # affinity-embeddings
//!
//! Embedding Aggregator and the conversation analysis providers.
//!
//! The aggregator folds a user's append-only embedding log into a
//! recency-weighted mean (`w_i = exp(-decay * i * 0.2)`, newest first) and
//! its L2-normalized form. Providers turn a batch of chat messages into a
//! trait summary plus its embedding: an OpenAI-compatible HTTP provider and
//! a deterministic offline fallback.

pub mod aggregator;
pub mod prompt;
pub mod providers;

pub use aggregator::EmbeddingAggregator;
pub use providers::{create_provider, ApiAnalysisProvider, LocalAnalysisProvider};
