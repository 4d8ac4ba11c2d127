use crossbeam_channel::Receiver;

use crate::errors::AffinityResult;
use crate::models::{
    AnalysisRecord, EmbeddingRecord, Message, PlatformStats, ProfileChange, StoredMessage,
    UserAccount, UserProfile, VersionedStats,
};

/// Registered accounts.
pub trait IUserStorage: Send + Sync {
    /// Insert, or merge into an existing account. Returns `true` if the
    /// account did not exist before.
    fn upsert_user(&self, account: &UserAccount) -> AffinityResult<bool>;
    fn get_user(&self, id: &str) -> AffinityResult<Option<UserAccount>>;
    fn list_user_ids(&self) -> AffinityResult<Vec<String>>;
    /// Whether the account has already been added to the platform user count.
    fn is_user_counted(&self, id: &str) -> AffinityResult<bool>;
    /// Record that the account was counted. Returns `false` if it already was.
    fn mark_user_counted(&self, id: &str) -> AffinityResult<bool>;
}

/// Per-user ordered message log.
pub trait IMessageStorage: Send + Sync {
    /// Append one message, assigning the next per-user sequence number.
    fn append_message(&self, user_id: &str, message: &Message) -> AffinityResult<StoredMessage>;
    /// All retained messages, oldest first.
    fn list_messages(&self, user_id: &str) -> AffinityResult<Vec<StoredMessage>>;
    fn count_messages(&self, user_id: &str) -> AffinityResult<usize>;
    /// Delete the given messages in a single batch.
    fn delete_messages(&self, user_id: &str, ids: &[i64]) -> AffinityResult<usize>;
}

/// Append-only analysis and embedding logs.
pub trait IEmbeddingStorage: Send + Sync {
    /// Persist an analysis document; returns its reference path.
    fn record_analysis(&self, user_id: &str, analysis: &AnalysisRecord) -> AffinityResult<String>;
    fn get_analysis(&self, user_id: &str, analysis_id: &str)
        -> AffinityResult<Option<AnalysisRecord>>;
    fn append_embedding(&self, user_id: &str, record: &EmbeddingRecord) -> AffinityResult<()>;
    fn list_embeddings(&self, user_id: &str) -> AffinityResult<Vec<EmbeddingRecord>>;
}

/// Profile documents.
pub trait IProfileStorage: Send + Sync {
    fn get_profile(&self, user_id: &str) -> AffinityResult<Option<UserProfile>>;
    /// Upsert a profile. Implementations notify change subscribers.
    fn save_profile(&self, profile: &UserProfile) -> AffinityResult<()>;
    fn list_profiles(&self) -> AffinityResult<Vec<UserProfile>>;
}

/// Platform statistics singleton with optimistic concurrency.
pub trait IStatsStorage: Send + Sync {
    /// `None` if the singleton has never been written.
    fn read_stats(&self) -> AffinityResult<Option<VersionedStats>>;
    /// Write `stats` only if the stored version still equals `expected_version`
    /// (`None` = the row must not exist yet). Returns `false` on conflict.
    fn compare_and_swap_stats(
        &self,
        expected_version: Option<u64>,
        stats: &PlatformStats,
    ) -> AffinityResult<bool>;
}

/// Push notifications on profile mutation.
pub trait IProfileChangeFeed: Send + Sync {
    fn subscribe(&self) -> Receiver<ProfileChange>;
}

/// Every capability the engine consumes from a document store.
pub trait IDocumentStore:
    IUserStorage + IMessageStorage + IEmbeddingStorage + IProfileStorage + IStatsStorage + IProfileChangeFeed
{
}

impl<T> IDocumentStore for T where
    T: IUserStorage
        + IMessageStorage
        + IEmbeddingStorage
        + IProfileStorage
        + IStatsStorage
        + IProfileChangeFeed
{
}
