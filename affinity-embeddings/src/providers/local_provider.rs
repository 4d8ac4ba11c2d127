//! Offline analysis provider.
//!
//! The summary is the de-duplicated vocabulary of the user's messages; the
//! embedding is a signed feature-hashing bag of words over that vocabulary.
//! Deterministic, no network.

use std::collections::BTreeMap;

use affinity_core::errors::{AffinityResult, AnalysisError};
use affinity_core::models::{AnalysisOutput, Message, MessageRole};
use affinity_core::traits::IAnalysisProvider;
use affinity_core::vector::normalize;

pub struct LocalAnalysisProvider {
    dimensions: usize,
}

impl LocalAnalysisProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Lowercase alphanumeric terms of at least two characters.
    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(str::to_lowercase)
    }

    /// Bucket index and sign for a term, from its blake3 digest.
    fn hash_term(term: &str, dims: usize) -> (usize, f32) {
        let digest = blake3::hash(term.as_bytes());
        let bytes = digest.as_bytes();
        let mut idx = [0u8; 8];
        idx.copy_from_slice(&bytes[..8]);
        let bucket = (u64::from_le_bytes(idx) % dims as u64) as usize;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }

    /// Term counts across user messages, in first-seen order.
    fn vocabulary(messages: &[Message]) -> Vec<(String, u32)> {
        let mut order = Vec::new();
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for msg in messages.iter().filter(|m| m.role == MessageRole::User) {
            for term in Self::tokenize(&msg.content) {
                let count = counts.entry(term.clone()).or_insert(0);
                if *count == 0 {
                    order.push(term);
                }
                *count += 1;
            }
        }
        order
            .into_iter()
            .map(|t| {
                let c = counts.get(&t).copied().unwrap_or(1);
                (t, c)
            })
            .collect()
    }

    fn embed_terms(&self, terms: &[(String, u32)]) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in terms {
            let (bucket, sign) = Self::hash_term(term, self.dimensions);
            vec[bucket] += sign * (1.0 + (*count as f32).ln());
        }
        normalize(&vec).unwrap_or(vec)
    }
}

impl IAnalysisProvider for LocalAnalysisProvider {
    fn analyze(&self, messages: &[Message]) -> AffinityResult<AnalysisOutput> {
        if messages.is_empty() {
            return Err(AnalysisError::EmptyBatch.into());
        }
        let terms = Self::vocabulary(messages);
        if terms.is_empty() {
            return Err(AnalysisError::InvalidResponse {
                reason: "no user vocabulary in batch".to_string(),
            }
            .into());
        }
        let analysis = terms
            .iter()
            .map(|(t, _)| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(AnalysisOutput {
            embedding: self.embed_terms(&terms),
            analysis,
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "local-hashing"
    }
}
