//! Platform stats singleton with a version column for compare-and-swap.

use rusqlite::{params, Connection, OptionalExtension};

use affinity_core::constants::PLATFORM_STATS_ID;
use affinity_core::errors::AffinityResult;
use affinity_core::models::{PlatformStats, VersionedStats};

use super::codec::{decode_time, encode_time};
use crate::to_storage_err;

pub fn read_stats(conn: &Connection) -> AffinityResult<Option<VersionedStats>> {
    let row = conn
        .query_row(
            "SELECT total_users, recency_importance, last_updated, version
             FROM platform_stats WHERE id = ?1",
            params![PLATFORM_STATS_ID],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(|(total_users, decay_coefficient, last_updated, version)| {
        Ok(VersionedStats {
            stats: PlatformStats {
                total_users: total_users as u64,
                decay_coefficient,
                last_updated: last_updated.as_deref().map(decode_time).transpose()?,
            },
            version: version as u64,
        })
    })
    .transpose()
}

/// Conditional write. `expected_version == None` only succeeds if the row is
/// absent; otherwise the stored version must match. Returns whether the write
/// happened.
pub fn compare_and_swap(
    conn: &Connection,
    expected_version: Option<u64>,
    stats: &PlatformStats,
) -> AffinityResult<bool> {
    let last_updated = stats.last_updated.as_ref().map(encode_time);
    let changed = match expected_version {
        None => conn.execute(
            "INSERT INTO platform_stats (id, total_users, recency_importance, last_updated, version)
             VALUES (?1, ?2, ?3, ?4, 1)
             ON CONFLICT(id) DO NOTHING",
            params![
                PLATFORM_STATS_ID,
                stats.total_users as i64,
                stats.decay_coefficient,
                last_updated,
            ],
        ),
        Some(version) => conn.execute(
            "UPDATE platform_stats SET
                total_users        = ?2,
                recency_importance = ?3,
                last_updated       = ?4,
                version            = version + 1
             WHERE id = ?1 AND version = ?5",
            params![
                PLATFORM_STATS_ID,
                stats.total_users as i64,
                stats.decay_coefficient,
                last_updated,
                version as i64,
            ],
        ),
    }
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}
