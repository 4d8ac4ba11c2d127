//! # affinity-decay
//!
//! Recency decay that adapts to platform scale.
//!
//! ```text
//! decay_coefficient = exp(-0.05 * log10(total_users)^3.3)
//! weight_i          = exp(-decay_coefficient * i * 0.2)
//! ```
//!
//! As the user base grows the coefficient shrinks toward 0, which flattens
//! the recency weights so a mature platform averages a user's history more
//! evenly. `PlatformScaleTracker` owns the user count and recomputes the
//! coefficient transactionally on every registration.

pub mod formula;
pub mod tracker;

pub use formula::{decay_coefficient, recency_weight, recency_weights};
pub use tracker::PlatformScaleTracker;
