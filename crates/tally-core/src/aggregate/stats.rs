/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Element at index `n / 2` of the ascending sort: the upper of the two
/// middle values for even `n`. 0 for an empty slice.
pub fn half_index_median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted[sorted.len() / 2]
}

/// Judge score per log2 output token: `avg_score / log2(avg_tokens)`.
/// 0 unless the model has a positive score and more than one token on average.
pub fn efficiency(avg_score: f64, avg_tokens: f64) -> f64 {
    if avg_score > 0.0 && avg_tokens > 1.0 {
        avg_score / avg_tokens.log2()
    } else {
        0.0
    }
}
