//! Dense vector math shared by aggregation and ranking.
//!
//! Vectors are stored as `f32`; every reduction accumulates in `f64`.

/// Dot product, or `None` if the lengths differ.
pub fn dot(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }
    Some(
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| *x as f64 * *y as f64)
            .sum(),
    )
}

/// Euclidean (L2) norm.
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt()
}

/// Scale `v` to unit length. `None` for the zero (or empty) vector.
pub fn normalize(v: &[f32]) -> Option<Vec<f32>> {
    let norm = l2_norm(v);
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    Some(v.iter().map(|x| (*x as f64 / norm) as f32).collect())
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// `None` when either norm is zero or the lengths differ. The result is
/// clamped to [-1, 1] to absorb rounding.
pub fn cosine(a: &[f32], b: &[f32]) -> Option<f64> {
    let d = dot(a, b)?;
    let denom = l2_norm(a) * l2_norm(b);
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((d / denom).clamp(-1.0, 1.0))
}

/// Per-dimension weighted mean `Σ w_i v_i / Σ w_i`.
///
/// `None` if there are no vectors, the weights sum to zero, or any vector's
/// length differs from the first one.
pub fn weighted_mean(vectors: &[&[f32]], weights: &[f64]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    if vectors.len() != weights.len() {
        return None;
    }
    let dims = first.len();
    let mut sums = vec![0.0f64; dims];
    let mut total_weight = 0.0f64;
    for (v, w) in vectors.iter().zip(weights.iter()) {
        if v.len() != dims {
            return None;
        }
        for (acc, x) in sums.iter_mut().zip(v.iter()) {
            *acc += w * *x as f64;
        }
        total_weight += w;
    }
    if total_weight == 0.0 {
        return None;
    }
    Some(sums.into_iter().map(|s| (s / total_weight) as f32).collect())
}
