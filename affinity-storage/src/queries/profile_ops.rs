//! Profile documents.

use rusqlite::{params, Connection, OptionalExtension};

use affinity_core::errors::AffinityResult;
use affinity_core::models::UserProfile;

use super::codec::{bytes_to_f32_vec, decode_time, encode_time, f32_vec_to_bytes};
use crate::to_storage_err;

type ProfileRow = (String, Option<Vec<u8>>, Option<Vec<u8>>, Option<String>);

const SELECT_PROFILE: &str =
    "SELECT user_id, main_embedding, normalized_embedding, last_embedding_update FROM profiles";

pub fn upsert_profile(conn: &Connection, profile: &UserProfile) -> AffinityResult<()> {
    conn.execute(
        "INSERT INTO profiles (user_id, main_embedding, normalized_embedding, last_embedding_update)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
            main_embedding        = excluded.main_embedding,
            normalized_embedding  = excluded.normalized_embedding,
            last_embedding_update = excluded.last_embedding_update",
        params![
            profile.id,
            profile.raw_average.as_deref().map(f32_vec_to_bytes),
            profile.normalized_average.as_deref().map(f32_vec_to_bytes),
            profile.last_update.as_ref().map(encode_time),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_profile(conn: &Connection, user_id: &str) -> AffinityResult<Option<UserProfile>> {
    let row = conn
        .query_row(
            &format!("{SELECT_PROFILE} WHERE user_id = ?1"),
            params![user_id],
            read_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(decode_row).transpose()
}

/// All profiles in creation order.
pub fn list_profiles(conn: &Connection) -> AffinityResult<Vec<UserProfile>> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_PROFILE} ORDER BY rowid"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], read_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut profiles = Vec::new();
    for row in rows {
        profiles.push(decode_row(row.map_err(|e| to_storage_err(e.to_string()))?)?);
    }
    Ok(profiles)
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProfileRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode_row((id, raw, normalized, updated): ProfileRow) -> AffinityResult<UserProfile> {
    Ok(UserProfile {
        id,
        raw_average: raw.as_deref().map(bytes_to_f32_vec).transpose()?,
        normalized_average: normalized.as_deref().map(bytes_to_f32_vec).transpose()?,
        last_update: updated.as_deref().map(decode_time).transpose()?,
    })
}
