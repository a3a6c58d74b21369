//! Period-over-period percentage change.

/// `ffill[i] / ffill[i - 1] - 1` over the forward-filled values.
///
/// A `NaN` takes the most recent valid value before it, so a gap reads as no
/// change and the row after it is measured against that same value. Only the
/// first element and any leading `NaN`s stay `NaN`. A previous value of zero
/// yields an infinity.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    let mut last: Option<f64> = None;

    for (i, &v) in values.iter().enumerate() {
        let filled = if v.is_nan() { last } else { Some(v) };
        if let (Some(prev), Some(cur)) = (last, filled) {
            result[i] = cur / prev - 1.0;
        }
        last = filled;
    }

    result
}
