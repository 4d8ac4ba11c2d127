//! # affinity-retention
//!
//! Message Retention Manager. Appends chat messages to a user's log, trims
//! the log to a fixed capacity in one batched delete, and emits an
//! `AnalysisRequest` carrying the latest cycle of messages every time the
//! user's message stream crosses a cycle boundary.
//!
//! Appends for the same user must be serialized by the caller.

pub mod boundary;
pub mod manager;

pub use boundary::is_cycle_boundary;
pub use manager::{AppendOutcome, RetentionManager};
