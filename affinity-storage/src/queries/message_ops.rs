//! Per-user ordered message log.

use rusqlite::{params, Connection};

use affinity_core::errors::AffinityResult;
use affinity_core::models::{Message, MessageRole, StoredMessage};

use super::codec::{decode_time, encode_time};
use crate::{to_corruption_err, to_storage_err};

/// Append a message, assigning the next per-user sequence number.
///
/// The newest message is never trimmed, so `MAX(sequence)` over the retained
/// rows is the number of messages since the log was last emptied.
pub fn append_message(
    conn: &Connection,
    user_id: &str,
    message: &Message,
) -> AffinityResult<StoredMessage> {
    conn.execute(
        "INSERT INTO messages (user_id, sequence, role, content, timestamp)
         SELECT ?1, COALESCE(MAX(sequence), 0) + 1, ?2, ?3, ?4
         FROM messages WHERE user_id = ?1",
        params![
            user_id,
            message.role.as_str(),
            message.content,
            encode_time(&message.timestamp),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    let id = conn.last_insert_rowid();
    let sequence: i64 = conn
        .query_row(
            "SELECT sequence FROM messages WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(StoredMessage {
        id,
        sequence: sequence as u64,
        message: message.clone(),
    })
}

/// Oldest first; ties on timestamp fall back to insertion order.
pub fn list_messages(conn: &Connection, user_id: &str) -> AffinityResult<Vec<StoredMessage>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, sequence, role, content, timestamp FROM messages
             WHERE user_id = ?1
             ORDER BY timestamp ASC, id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut messages = Vec::new();
    for row in rows {
        let (id, sequence, role, content, timestamp) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let role = MessageRole::parse(&role)
            .ok_or_else(|| to_corruption_err(format!("message {id} has unknown role '{role}'")))?;
        messages.push(StoredMessage {
            id,
            sequence: sequence as u64,
            message: Message {
                role,
                content,
                timestamp: decode_time(&timestamp)?,
            },
        });
    }
    Ok(messages)
}

pub fn count_messages(conn: &Connection, user_id: &str) -> AffinityResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM messages WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Delete a batch of messages atomically.
pub fn delete_messages(conn: &Connection, user_id: &str, ids: &[i64]) -> AffinityResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("delete_messages begin: {e}")))?;

    let mut deleted = 0;
    {
        let mut stmt = tx
            .prepare_cached("DELETE FROM messages WHERE user_id = ?1 AND id = ?2")
            .map_err(|e| to_storage_err(e.to_string()))?;
        for id in ids {
            deleted += stmt
                .execute(params![user_id, id])
                .map_err(|e| to_storage_err(e.to_string()))?;
        }
    }

    tx.commit()
        .map_err(|e| to_storage_err(format!("delete_messages commit: {e}")))?;
    Ok(deleted)
}
