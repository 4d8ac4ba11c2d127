//! v002: analyses, embeddings.

use rusqlite::Connection;

use affinity_core::errors::AffinityResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AffinityResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS analyses (
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            id         TEXT NOT NULL,
            analysis   TEXT NOT NULL,
            messages   TEXT NOT NULL DEFAULT '[]',
            timestamp  TEXT NOT NULL,
            PRIMARY KEY (user_id, id)
        );

        CREATE TABLE IF NOT EXISTS embeddings (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            embedding      BLOB NOT NULL,
            dimensions     INTEGER NOT NULL,
            analysis_path  TEXT NOT NULL,
            timestamp      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_embeddings_user_ts ON embeddings(user_id, timestamp);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
