//! v003: profiles, platform_stats singleton.

use rusqlite::Connection;

use affinity_core::errors::AffinityResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AffinityResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS profiles (
            user_id                TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            main_embedding         BLOB,
            normalized_embedding   BLOB,
            last_embedding_update  TEXT
        );

        CREATE TABLE IF NOT EXISTS platform_stats (
            id                 INTEGER PRIMARY KEY CHECK (id = 1),
            total_users        INTEGER NOT NULL DEFAULT 0,
            recency_importance REAL NOT NULL DEFAULT 1.0,
            last_updated       TEXT,
            version            INTEGER NOT NULL DEFAULT 1
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
