//! Rolling average of traded volume.

use super::date_keys;
use crate::domain::{bar, MetricSeries, PriceBar};
use crate::indicators::{median, rolling_mean};

pub const AVERAGE_VOLUME: &str = "Average Volume";

/// Zero volumes count as missing. A column with no usable volume becomes all
/// zeros; otherwise gaps take the median of the usable values.
pub fn clean_volume(volumes: &[f64]) -> Vec<f64> {
    let masked: Vec<f64> = volumes
        .iter()
        .map(|&v| if v == 0.0 { f64::NAN } else { v })
        .collect();

    match median(&masked) {
        None => vec![0.0; volumes.len()],
        Some(m) => masked
            .into_iter()
            .map(|v| if v.is_nan() { m } else { v })
            .collect(),
    }
}

/// Trailing mean of cleaned volume with a minimum of one observation.
pub fn traded_volume(bars: &[PriceBar], window: usize) -> MetricSeries {
    let cleaned = clean_volume(&bar::volumes(bars));
    MetricSeries::from_values(AVERAGE_VOLUME, date_keys(bars), rolling_mean(&cleaned, window, 1))
}
