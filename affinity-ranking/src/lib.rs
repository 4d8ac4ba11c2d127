//! # affinity-ranking
//!
//! Similarity Ranker. Scores every other user's profile against the
//! requester's with cosine similarity, rescales scores above the midpoint
//! onto [0, 1], sharpens them with a logistic curve, and keeps the best
//! `top_k`. Candidates whose vectors are missing or malformed still appear,
//! with null scores, after every scored candidate.
//!
//! `RankingWatcher` keeps published rankings fresh by re-ranking watched
//! users whenever the store reports a profile change.

pub mod ranker;
pub mod similarity;
pub mod watcher;

pub use ranker::{compare_amplified_desc, SimilarityRanker};
pub use similarity::{amplify, scale, score_candidate, sigmoid};
pub use watcher::RankingWatcher;
