/// Affinity system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of messages retained per user.
pub const MAX_RETAINED_MESSAGES: usize = 60;

/// Number of newly retained messages that make up one analysis cycle.
pub const ANALYSIS_CYCLE_LENGTH: usize = 6;

/// Number of candidates returned by a ranking.
pub const RANKING_TOP_K: usize = 5;

/// Singleton document id of the platform statistics row.
pub const PLATFORM_STATS_ID: i64 = 1;

/// Path segment prefix used when building analysis references.
pub const USERS_COLLECTION: &str = "users";

/// Sub-collection holding analysis documents.
pub const ANALYSIS_COLLECTION: &str = "analysis";
