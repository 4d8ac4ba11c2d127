use std::sync::Arc;

use tracing::{debug, info};

use affinity_core::config::RetentionConfig;
use affinity_core::errors::AffinityResult;
use affinity_core::models::{AnalysisRequest, Message, StoredMessage};
use affinity_core::traits::IMessageStorage;

use crate::boundary::is_cycle_boundary;

/// Result of one append.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    /// Messages retained for the user after trimming.
    pub retained_count: usize,
    /// Messages deleted by this append's trim.
    pub trimmed: usize,
    /// Present when this append closed an analysis cycle.
    pub request: Option<AnalysisRequest>,
}

/// Appends messages, enforces the history cap, detects cycle boundaries.
pub struct RetentionManager<S: IMessageStorage> {
    store: Arc<S>,
    config: RetentionConfig,
}

impl<S: IMessageStorage> RetentionManager<S> {
    pub fn new(store: Arc<S>, config: RetentionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Append `message` to the user's log.
    ///
    /// If the log then exceeds capacity, the oldest excess messages are
    /// deleted in a single batch. When the appended message is the last of a
    /// cycle, the outcome carries the `cycle_length` most recent retained
    /// messages, oldest first.
    pub fn append_message(&self, user_id: &str, message: Message) -> AffinityResult<AppendOutcome> {
        let appended = self.store.append_message(user_id, &message)?;
        let mut messages = self.store.list_messages(user_id)?;

        let mut trimmed = 0;
        if messages.len() > self.config.capacity {
            let excess = messages.len() - self.config.capacity;
            let ids: Vec<i64> = messages[..excess].iter().map(|m| m.id).collect();
            trimmed = self.store.delete_messages(user_id, &ids)?;
            messages.drain(..excess);
            debug!(user_id, trimmed, "trimmed message history");
        }

        let retained_count = messages.len();
        let request = if is_cycle_boundary(appended.sequence, self.config.cycle_length) {
            info!(
                user_id,
                sequence = appended.sequence,
                retained = retained_count,
                "analysis cycle boundary reached"
            );
            Some(AnalysisRequest {
                user_id: user_id.to_string(),
                messages: latest(&messages, self.config.cycle_length),
            })
        } else {
            None
        };

        Ok(AppendOutcome {
            retained_count,
            trimmed,
            request,
        })
    }

    /// Delete the user's whole message log in one batch. Returns how many
    /// messages were removed.
    ///
    /// Sequence numbers restart afterwards, so the next `cycle_length`
    /// appends close a fresh cycle. Analyses and embeddings are kept.
    pub fn clear_history(&self, user_id: &str) -> AffinityResult<usize> {
        let ids: Vec<i64> = self
            .store
            .list_messages(user_id)?
            .iter()
            .map(|m| m.id)
            .collect();
        let cleared = self.store.delete_messages(user_id, &ids)?;
        info!(user_id, cleared, "message history cleared");
        Ok(cleared)
    }

    /// Retained messages, oldest first.
    pub fn load_history(&self, user_id: &str) -> AffinityResult<Vec<Message>> {
        Ok(self
            .store
            .list_messages(user_id)?
            .into_iter()
            .map(|m| m.message)
            .collect())
    }
}

fn latest(messages: &[StoredMessage], n: usize) -> Vec<Message> {
    let start = messages.len().saturating_sub(n);
    messages[start..].iter().map(|m| m.message.clone()).collect()
}
