//! Market breadth: advancing days over declining days in a trailing window.

use super::date_keys;
use crate::domain::{MetricSeries, PriceBar};
use crate::indicators::{fill_nan, rolling_count};

pub const ADVANCE_DECLINE: &str = "Advance-Decline Ratio";

/// Advance-decline ratio over the bars after the first `skip` rows.
///
/// An advance closes above its open and a decline below it. The ratio keeps
/// IEEE semantics (a window with no declines is `inf`, no moves at all is
/// `NaN`); only `NaN` and the incomplete leading windows are filled with 0.
pub fn market_breadth(bars: &[PriceBar], window: usize, skip: usize) -> MetricSeries {
    let bars = &bars[skip.min(bars.len())..];
    let advances: Vec<bool> = bars.iter().map(PriceBar::is_advance).collect();
    let declines: Vec<bool> = bars.iter().map(PriceBar::is_decline).collect();

    let up = rolling_count(&advances, window);
    let down = rolling_count(&declines, window);
    let ratio: Vec<f64> = up.iter().zip(&down).map(|(u, d)| u / d).collect();

    MetricSeries::from_values(ADVANCE_DECLINE, date_keys(bars), fill_nan(&ratio, 0.0))
}
