//! StorageEngine — owns the ConnectionPool and the change feed, implements
//! every storage capability trait.

use std::path::Path;

use chrono::Utc;
use crossbeam_channel::Receiver;
use tracing::debug;

use affinity_core::config::StorageConfig;
use affinity_core::errors::AffinityResult;
use affinity_core::models::{
    AnalysisRecord, EmbeddingRecord, Message, PlatformStats, ProfileChange, StoredMessage,
    UserAccount, UserProfile, VersionedStats,
};
use affinity_core::traits::{
    IEmbeddingStorage, IMessageStorage, IProfileChangeFeed, IProfileStorage, IStatsStorage,
    IUserStorage,
};

use crate::migrations;
use crate::notify::ChangeFeed;
use crate::pool::ConnectionPool;
use crate::queries::{embedding_ops, message_ops, profile_ops, stats_ops, user_ops};

/// The main storage engine.
pub struct StorageEngine {
    pool: ConnectionPool,
    feed: ChangeFeed,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk with default settings.
    pub fn open(path: &Path) -> AffinityResult<Self> {
        let defaults = StorageConfig::default();
        Self::open_with(path, defaults.read_pool_size, defaults.busy_timeout_ms)
    }

    /// Open the database named in the config.
    pub fn open_with_config(config: &StorageConfig) -> AffinityResult<Self> {
        Self::open_with(
            Path::new(&config.db_path),
            config.read_pool_size,
            config.busy_timeout_ms,
        )
    }

    fn open_with(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> AffinityResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size, busy_timeout_ms)?;
        let engine = Self {
            pool,
            feed: ChangeFeed::new(),
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> AffinityResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            feed: ChangeFeed::new(),
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> AffinityResult<()> {
        let version = self.pool.writer.with_conn(migrations::run_migrations)?;
        debug!(schema_version = version, "storage initialized");
        Ok(())
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Get the change feed (publishers outside the engine, diagnostics).
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    fn with_reader<F, T>(&self, f: F) -> AffinityResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> AffinityResult<T>,
    {
        self.pool.with_reader(f)
    }
}

impl IUserStorage for StorageEngine {
    fn upsert_user(&self, account: &UserAccount) -> AffinityResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| user_ops::upsert_user(conn, account))
    }

    fn get_user(&self, id: &str) -> AffinityResult<Option<UserAccount>> {
        self.with_reader(|conn| user_ops::get_user(conn, id))
    }

    fn list_user_ids(&self) -> AffinityResult<Vec<String>> {
        self.with_reader(user_ops::list_user_ids)
    }

    fn is_user_counted(&self, id: &str) -> AffinityResult<bool> {
        self.with_reader(|conn| user_ops::is_counted(conn, id))
    }

    fn mark_user_counted(&self, id: &str) -> AffinityResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| user_ops::mark_counted(conn, id))
    }
}

impl IMessageStorage for StorageEngine {
    fn append_message(&self, user_id: &str, message: &Message) -> AffinityResult<StoredMessage> {
        self.pool
            .writer
            .with_conn(|conn| message_ops::append_message(conn, user_id, message))
    }

    fn list_messages(&self, user_id: &str) -> AffinityResult<Vec<StoredMessage>> {
        self.with_reader(|conn| message_ops::list_messages(conn, user_id))
    }

    fn count_messages(&self, user_id: &str) -> AffinityResult<usize> {
        self.with_reader(|conn| message_ops::count_messages(conn, user_id))
    }

    fn delete_messages(&self, user_id: &str, ids: &[i64]) -> AffinityResult<usize> {
        self.pool
            .writer
            .with_conn(|conn| message_ops::delete_messages(conn, user_id, ids))
    }
}

impl IEmbeddingStorage for StorageEngine {
    fn record_analysis(&self, user_id: &str, analysis: &AnalysisRecord) -> AffinityResult<String> {
        self.pool
            .writer
            .with_conn(|conn| embedding_ops::insert_analysis(conn, user_id, analysis))
    }

    fn get_analysis(
        &self,
        user_id: &str,
        analysis_id: &str,
    ) -> AffinityResult<Option<AnalysisRecord>> {
        self.with_reader(|conn| embedding_ops::get_analysis(conn, user_id, analysis_id))
    }

    fn append_embedding(&self, user_id: &str, record: &EmbeddingRecord) -> AffinityResult<()> {
        self.pool
            .writer
            .with_conn(|conn| embedding_ops::insert_embedding(conn, user_id, record))
    }

    fn list_embeddings(&self, user_id: &str) -> AffinityResult<Vec<EmbeddingRecord>> {
        self.with_reader(|conn| embedding_ops::list_embeddings(conn, user_id))
    }
}

impl IProfileStorage for StorageEngine {
    fn get_profile(&self, user_id: &str) -> AffinityResult<Option<UserProfile>> {
        self.with_reader(|conn| profile_ops::get_profile(conn, user_id))
    }

    fn save_profile(&self, profile: &UserProfile) -> AffinityResult<()> {
        self.pool
            .writer
            .with_conn(|conn| profile_ops::upsert_profile(conn, profile))?;
        // Publish after the write lock is released and the row is committed.
        let delivered = self.feed.publish(ProfileChange {
            user_id: profile.id.clone(),
            updated_at: profile.last_update.unwrap_or_else(Utc::now),
        });
        debug!(user_id = %profile.id, subscribers = delivered, "profile saved");
        Ok(())
    }

    fn list_profiles(&self) -> AffinityResult<Vec<UserProfile>> {
        self.with_reader(profile_ops::list_profiles)
    }
}

impl IStatsStorage for StorageEngine {
    fn read_stats(&self) -> AffinityResult<Option<VersionedStats>> {
        self.with_reader(stats_ops::read_stats)
    }

    fn compare_and_swap_stats(
        &self,
        expected_version: Option<u64>,
        stats: &PlatformStats,
    ) -> AffinityResult<bool> {
        self.pool
            .writer
            .with_conn(|conn| stats_ops::compare_and_swap(conn, expected_version, stats))
    }
}

impl IProfileChangeFeed for StorageEngine {
    fn subscribe(&self) -> Receiver<ProfileChange> {
        self.feed.subscribe()
    }
}
