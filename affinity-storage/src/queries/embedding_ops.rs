//! Append-only analysis and embedding logs.

use rusqlite::{params, Connection, OptionalExtension};

use affinity_core::errors::AffinityResult;
use affinity_core::models::{AnalysisRecord, EmbeddingRecord};

use super::codec::{bytes_to_f32_vec, decode_time, encode_time, f32_vec_to_bytes};
use crate::{to_corruption_err, to_storage_err};

/// Store an analysis document. Returns its reference path.
pub fn insert_analysis(
    conn: &Connection,
    user_id: &str,
    analysis: &AnalysisRecord,
) -> AffinityResult<String> {
    let messages_json = serde_json::to_string(&analysis.messages)?;
    conn.execute(
        "INSERT INTO analyses (user_id, id, analysis, messages, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            analysis.id,
            analysis.analysis,
            messages_json,
            encode_time(&analysis.timestamp),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(analysis.reference(user_id))
}

pub fn get_analysis(
    conn: &Connection,
    user_id: &str,
    analysis_id: &str,
) -> AffinityResult<Option<AnalysisRecord>> {
    let row = conn
        .query_row(
            "SELECT id, analysis, messages, timestamp FROM analyses
             WHERE user_id = ?1 AND id = ?2",
            params![user_id, analysis_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(|(id, analysis, messages, timestamp)| {
        Ok(AnalysisRecord {
            id,
            analysis,
            messages: serde_json::from_str(&messages)?,
            timestamp: decode_time(&timestamp)?,
        })
    })
    .transpose()
}

pub fn insert_embedding(
    conn: &Connection,
    user_id: &str,
    record: &EmbeddingRecord,
) -> AffinityResult<()> {
    conn.execute(
        "INSERT INTO embeddings (user_id, embedding, dimensions, analysis_path, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            f32_vec_to_bytes(&record.vector),
            record.vector.len() as i64,
            record.analysis_ref,
            encode_time(&record.timestamp),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Every embedding for the user, in insertion order.
pub fn list_embeddings(conn: &Connection, user_id: &str) -> AffinityResult<Vec<EmbeddingRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, embedding, dimensions, analysis_path, timestamp FROM embeddings
             WHERE user_id = ?1
             ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Vec<u8>>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        let (id, blob, dims, analysis_ref, timestamp) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        let vector = bytes_to_f32_vec(&blob)?;
        if vector.len() as i64 != dims {
            return Err(to_corruption_err(format!(
                "embedding {id} declares {dims} dimensions but holds {}",
                vector.len()
            )));
        }
        records.push(EmbeddingRecord {
            vector,
            timestamp: decode_time(&timestamp)?,
            analysis_ref,
        });
    }
    Ok(records)
}
