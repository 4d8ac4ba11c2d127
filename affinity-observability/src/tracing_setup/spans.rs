//! Span definitions per operation: retention, aggregation, ranking,
//! analysis, registration.

/// Create a retention span around one appended message.
#[macro_export]
macro_rules! retention_span {
    ($user_id:expr) => {
        tracing::info_span!("affinity.retention", user_id = %$user_id)
    };
}

/// Create an aggregation span around one profile recomputation.
#[macro_export]
macro_rules! aggregation_span {
    ($user_id:expr) => {
        tracing::info_span!("affinity.aggregation", user_id = %$user_id)
    };
}

/// Create a ranking span.
#[macro_export]
macro_rules! ranking_span {
    ($user_id:expr, $candidates:expr) => {
        tracing::info_span!("affinity.ranking", user_id = %$user_id, candidates = $candidates)
    };
}

/// Create an analysis span around one provider call cycle.
#[macro_export]
macro_rules! analysis_span {
    ($user_id:expr, $provider:expr) => {
        tracing::info_span!("affinity.analysis", user_id = %$user_id, provider = %$provider)
    };
}

/// Create a registration span.
#[macro_export]
macro_rules! registration_span {
    ($user_id:expr) => {
        tracing::info_span!("affinity.registration", user_id = %$user_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const RETENTION: &str = "affinity.retention";
    pub const AGGREGATION: &str = "affinity.aggregation";
    pub const RANKING: &str = "affinity.ranking";
    pub const ANALYSIS: &str = "affinity.analysis";
    pub const REGISTRATION: &str = "affinity.registration";
}
