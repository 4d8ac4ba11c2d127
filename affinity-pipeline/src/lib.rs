//! # affinity-pipeline
//!
//! Wires the subsystems into the engine's two entry points: registering a
//! user and handling one conversation message. A message append that closes
//! an analysis cycle runs the analysis provider (with bounded retries),
//! records the analysis and its embedding, and recomputes the profile, all
//! under the user's lock.

pub mod outcome;
pub mod pipeline;

pub use outcome::{AnalysisStatus, RegistrationOutcome, TurnOutcome};
pub use pipeline::AffinityPipeline;
