//! # affinity-storage
//!
//! SQLite-backed document store. One write connection, a pool of read
//! connections (WAL), schema migrations, and a push feed for profile changes.
//! `StorageEngine` implements every storage capability trait from
//! `affinity-core`, so it can be injected anywhere an `IDocumentStore` is
//! expected.

pub mod engine;
pub mod migrations;
pub mod notify;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use notify::ChangeFeed;

use affinity_core::errors::{AffinityError, StorageError};

/// Wrap a low-level failure message as a storage error.
pub(crate) fn to_storage_err(message: String) -> AffinityError {
    StorageError::SqliteError { message }.into()
}

/// Wrap a malformed persisted value as a corruption error.
pub(crate) fn to_corruption_err(details: String) -> AffinityError {
    StorageError::CorruptionDetected { details }.into()
}
