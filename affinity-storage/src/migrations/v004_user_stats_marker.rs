//! v004: users.counted_in_stats.
//!
//! Rows that predate the column were counted when they were created.

use rusqlite::Connection;

use affinity_core::errors::AffinityResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> AffinityResult<()> {
    conn.execute_batch(
        "
        ALTER TABLE users ADD COLUMN counted_in_stats INTEGER NOT NULL DEFAULT 0;
        UPDATE users SET counted_in_stats = 1;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
