//! Column encodings: little-endian f32 blobs and fixed-width RFC 3339 timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

use affinity_core::errors::AffinityResult;

use crate::to_corruption_err;

pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

pub fn bytes_to_f32_vec(bytes: &[u8]) -> AffinityResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(to_corruption_err(format!(
            "vector blob of {} bytes is not a whole number of f32 values",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Microsecond precision with a `Z` suffix, so lexical order matches time order.
pub fn encode_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_time(s: &str) -> AffinityResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| to_corruption_err(format!("bad timestamp '{s}': {e}")))
}
