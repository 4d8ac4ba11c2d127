//! Account rows.

use rusqlite::{params, Connection, OptionalExtension};

use affinity_core::errors::AffinityResult;
use affinity_core::models::UserAccount;

use super::codec::{decode_time, encode_time};
use crate::to_storage_err;

/// Insert the account, or merge sign-in details into the existing row.
/// Returns `true` if the row was created.
pub fn upsert_user(conn: &Connection, account: &UserAccount) -> AffinityResult<bool> {
    let inserted = conn
        .execute(
            "INSERT INTO users (id, display_name, email, created_at, last_sign_in)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO NOTHING",
            params![
                account.id,
                account.display_name,
                account.email,
                encode_time(&account.created_at),
                encode_time(&account.last_sign_in),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    if inserted == 1 {
        return Ok(true);
    }

    conn.execute(
        "UPDATE users SET
            display_name = COALESCE(?2, display_name),
            email        = COALESCE(?3, email),
            last_sign_in = ?4
         WHERE id = ?1",
        params![
            account.id,
            account.display_name,
            account.email,
            encode_time(&account.last_sign_in),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(false)
}

pub fn get_user(conn: &Connection, id: &str) -> AffinityResult<Option<UserAccount>> {
    let row = conn
        .query_row(
            "SELECT id, display_name, email, created_at, last_sign_in FROM users WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(|(id, display_name, email, created_at, last_sign_in)| {
        Ok(UserAccount {
            id,
            display_name,
            email,
            created_at: decode_time(&created_at)?,
            last_sign_in: decode_time(&last_sign_in)?,
        })
    })
    .transpose()
}

/// Whether the account has been added to the platform user count.
/// `false` for unknown ids.
pub fn is_counted(conn: &Connection, id: &str) -> AffinityResult<bool> {
    let counted = conn
        .query_row(
            "SELECT counted_in_stats FROM users WHERE id = ?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(counted.unwrap_or(0) != 0)
}

/// Set the counted marker. Returns `false` if it was already set or the
/// account does not exist.
pub fn mark_counted(conn: &Connection, id: &str) -> AffinityResult<bool> {
    let changed = conn
        .execute(
            "UPDATE users SET counted_in_stats = 1 WHERE id = ?1 AND counted_in_stats = 0",
            params![id],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

/// All account ids in registration order.
pub fn list_user_ids(conn: &Connection) -> AffinityResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT id FROM users ORDER BY rowid")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
