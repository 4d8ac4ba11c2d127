//! # affinity-core
//!
//! Foundation crate for the Affinity matching engine.
//! Defines all models, capability traits, errors, config, constants,
//! and the vector math shared by aggregation and ranking.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod vector;

// Re-export the most commonly used types at the crate root.
pub use config::AffinityConfig;
pub use errors::{AffinityError, AffinityResult};
pub use models::{
    AnalysisOutput, AnalysisRecord, AnalysisRequest, EmbeddingRecord, Message, MessageRole,
    PlatformStats, ProfileChange, RankedCandidate, StoredMessage, UserAccount, UserProfile,
    VersionedStats,
};
