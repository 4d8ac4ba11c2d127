use crate::errors::AffinityResult;
use crate::models::{AnalysisOutput, Message};

/// Turns a batch of conversation messages into a trait summary and its embedding.
pub trait IAnalysisProvider: Send + Sync {
    /// Analyze an ordered batch of messages (oldest first).
    fn analyze(&self, messages: &[Message]) -> AffinityResult<AnalysisOutput>;

    /// Dimensionality D of every embedding this provider returns.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
