//! Vector similarity for the semantic sub-score

/// Cosine similarity of two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scale a cosine similarity to the -100..=100 sub-score range.
///
/// Negative similarity stays negative and pulls the blended total down;
/// only the blend clamps to 0–100.
pub fn semantic_score(cosine: f64) -> f64 {
    cosine * 100.0
}
