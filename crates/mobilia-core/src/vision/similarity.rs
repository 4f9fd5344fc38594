//! Cosine-similarity ranking over embedding vectors.
//!
//! Pure functions, no allocation beyond the result vector. The zero-vector
//! case is defined as similarity 0.0 rather than NaN; not every library
//! default guards this, so it is handled explicitly here.

/// Cosine similarity between two vectors: dot(a,b) / (|a| * |b|).
///
/// Returns 0.0 when either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Rank candidate embeddings against a query embedding.
///
/// Returns `(index, score)` pairs sorted by non-increasing similarity.
/// The sort is stable, so ties keep the candidates' original order.
pub fn rank_by_similarity<'a>(
    query: &[f32],
    candidates: impl IntoIterator<Item = &'a [f32]>,
) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, emb)| (i, cosine_similarity(query, emb)))
        .collect();

    // cosine_similarity never returns NaN, so total ordering holds
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}
