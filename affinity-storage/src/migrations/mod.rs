//! Forward-only schema migrations tracked through `PRAGMA user_version`.

mod v001_users_and_messages;
mod v002_analysis_and_embeddings;
mod v003_profiles_and_stats;
mod v004_user_stats_marker;

use rusqlite::Connection;

use affinity_core::errors::{AffinityResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> AffinityResult<()>;

/// Ordered list of (version, migration).
const MIGRATIONS: &[(u32, MigrationFn)] = &[
    (1, v001_users_and_messages::migrate),
    (2, v002_analysis_and_embeddings::migrate),
    (3, v003_profiles_and_stats::migrate),
    (4, v004_user_stats_marker::migrate),
];

/// Latest schema version.
pub const LATEST_VERSION: u32 = 4;

/// Current schema version of a database.
pub fn current_version(conn: &Connection) -> AffinityResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the database's version, each in its own
/// transaction.
pub fn run_migrations(conn: &Connection) -> AffinityResult<u32> {
    let mut version = current_version(conn)?;
    for (target, migrate) in MIGRATIONS {
        if *target <= version {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration begin: {e}")))?;
        let applied = migrate(&tx).and_then(|()| {
            tx.pragma_update(None, "user_version", target)
                .map_err(|e| to_storage_err(e.to_string()))
        });
        if let Err(e) = applied {
            let _ = tx.rollback();
            return Err(StorageError::MigrationFailed {
                version: *target,
                reason: e.to_string(),
            }
            .into());
        }
        tx.commit()
            .map_err(|e| to_storage_err(format!("migration commit: {e}")))?;
        tracing::debug!(version = *target, "applied migration");
        version = *target;
    }
    Ok(version)
}
