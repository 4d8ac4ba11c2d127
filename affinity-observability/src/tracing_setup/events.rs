//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

/// A message closed an analysis cycle.
pub fn analysis_cycle_triggered(user_id: &str, retained: usize, batch: usize) {
    tracing::info!(
        event = "analysis_cycle_triggered",
        user_id = %user_id,
        retained = retained,
        batch = batch,
        "analysis cycle triggered"
    );
}

/// The provider failed every attempt; the cycle produced no embedding.
pub fn analysis_skipped(user_id: &str, attempts: u32, reason: &str) {
    tracing::warn!(
        event = "analysis_skipped",
        user_id = %user_id,
        attempts = attempts,
        reason = %reason,
        "analysis skipped"
    );
}

/// A profile was recomputed from the user's embedding log.
pub fn profile_recomputed(user_id: &str, records: usize, decay_coefficient: f64) {
    tracing::info!(
        event = "profile_recomputed",
        user_id = %user_id,
        records = records,
        decay_coefficient = decay_coefficient,
        "profile recomputed"
    );
}

/// A registration completed. `created` is false for a repeat sign-in.
pub fn user_registered(user_id: &str, created: bool, total_users: u64) {
    tracing::info!(
        event = "user_registered",
        user_id = %user_id,
        created = created,
        total_users = total_users,
        "user registered"
    );
}

/// Fresh rankings were published for a watched user.
pub fn rankings_published(user_id: &str, entries: usize) {
    tracing::debug!(
        event = "rankings_published",
        user_id = %user_id,
        entries = entries,
        "rankings published"
    );
}
