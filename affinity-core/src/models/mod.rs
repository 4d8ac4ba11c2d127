mod analysis;
mod embedding_record;
mod message;
mod platform_stats;
mod profile_change;
mod ranked_candidate;
mod user;

pub use analysis::{AnalysisOutput, AnalysisRecord, AnalysisRequest};
pub use embedding_record::EmbeddingRecord;
pub use message::{Message, MessageRole, StoredMessage};
pub use platform_stats::{PlatformStats, VersionedStats};
pub use profile_change::ProfileChange;
pub use ranked_candidate::RankedCandidate;
pub use user::{UserAccount, UserProfile};
