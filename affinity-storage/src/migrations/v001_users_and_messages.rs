//! v001: users, messages.

use rusqlite::Connection;

use affinity_core::errors::AffinityResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AffinityResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            display_name  TEXT,
            email         TEXT,
            created_at    TEXT NOT NULL,
            last_sign_in  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS messages (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            sequence   INTEGER NOT NULL,
            role       TEXT NOT NULL,
            content    TEXT NOT NULL,
            timestamp  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_user_ts ON messages(user_id, timestamp, id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_messages_user_seq ON messages(user_id, sequence);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
