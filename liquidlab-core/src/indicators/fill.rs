//! Missing-value policies.

/// Replace `NaN` by `fill`. Infinities are left untouched.
pub fn fill_nan(values: &[f64], fill: f64) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v.is_nan() { fill } else { v })
        .collect()
}

/// Replace `+inf` and `-inf` by `NaN`.
pub fn replace_infinite(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v.is_infinite() { f64::NAN } else { v })
        .collect()
}

/// Median of the non-NaN values; `None` when there are none.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
