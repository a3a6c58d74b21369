//! Rolling volatility of daily returns and the index/midcap volatility ratio.

use super::date_keys;
use crate::domain::{bar, MetricSeries, PriceBar};
use crate::indicators::{fill_nan, pct_change, rolling_std};

pub const VOLATILITY: &str = "30-Day Volatility";
pub const VOLATILITY_RATIO: &str = "Volatility Ratio";

/// Volatility outputs for the broad index and the midcap index.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityMetrics {
    pub index: MetricSeries,
    pub ratio: MetricSeries,
    pub midcap: MetricSeries,
}

/// Sample std of daily returns over a trailing window, before any fill.
fn raw_volatility(bars: &[PriceBar], window: usize) -> Vec<f64> {
    rolling_std(&pct_change(&bar::closes(bars)), window)
}

/// Rolling volatility of both indices and their ratio.
///
/// The ratio pairs rows by position, not by date; index rows past the end of
/// the midcap series divide by `NaN`. Missing values are then filled with 0,
/// which also zeroes the first `window` rows. Infinite ratios (midcap
/// volatility exactly 0) are kept.
pub fn volatility_metrics(
    index_bars: &[PriceBar],
    midcap_bars: &[PriceBar],
    window: usize,
) -> VolatilityMetrics {
    let index_vol = raw_volatility(index_bars, window);
    let midcap_vol = raw_volatility(midcap_bars, window);

    let ratio: Vec<f64> = index_vol
        .iter()
        .enumerate()
        .map(|(i, v)| v / midcap_vol.get(i).copied().unwrap_or(f64::NAN))
        .collect();

    let index_keys = date_keys(index_bars);
    VolatilityMetrics {
        index: MetricSeries::from_values(VOLATILITY, index_keys.clone(), fill_nan(&index_vol, 0.0)),
        ratio: MetricSeries::from_values(VOLATILITY_RATIO, index_keys, fill_nan(&ratio, 0.0)),
        midcap: MetricSeries::from_values(
            VOLATILITY,
            date_keys(midcap_bars),
            fill_nan(&midcap_vol, 0.0),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fixtures::bars_from_closes;
    use crate::indicators::assert_approx;

    fn zigzag(n: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + if i % 2 == 0 { amplitude } else { -amplitude })
            .collect()
    }

    #[test]
    fn fewer_than_window_samples_are_zero_after_fill() {
        let bars = bars_from_closes(&zigzag(25, 1.0));
        let m = volatility_metrics(&bars, &bars, 30);
        assert_eq!(m.index.len(), 25);
        assert!(m.index.values().iter().all(|&v| v == 0.0));
        assert!(m.ratio.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn first_value_appears_after_window_returns() {
        let bars = bars_from_closes(&zigzag(40, 1.0));
        let m = volatility_metrics(&bars, &bars, 30);
        let v = m.index.values();
        // pct_change leaves row 0 undefined, so the first full window ends at row 30
        assert!(v[..30].iter().all(|&x| x == 0.0));
        assert!(v[30] > 0.0);
        assert_approx(m.ratio.values()[35], 1.0, 1e-12);
    }

    #[test]
    fn ratio_pairs_rows_by_position() {
        let index = bars_from_closes(&zigzag(40, 2.0));
        let midcap = bars_from_closes(&zigzag(35, 1.0));
        let m = volatility_metrics(&index, &midcap, 30);
        assert_eq!(m.ratio.len(), 40);
        assert_eq!(m.midcap.len(), 35);
        assert!(m.ratio.values()[34] > 1.9);
        // no midcap row to divide by
        assert_eq!(m.ratio.values()[37], 0.0);
    }

    #[test]
    fn flat_midcap_gives_infinite_ratio() {
        let index = bars_from_closes(&zigzag(32, 1.0));
        let midcap = bars_from_closes(&[100.0; 32]);
        let m = volatility_metrics(&index, &midcap, 30);
        assert!(m.ratio.values()[31].is_infinite());
        assert_eq!(m.midcap.values()[31], 0.0);
    }

    #[test]
    fn missing_close_does_not_blank_the_window() {
        let mut closes = zigzag(70, 1.0);
        closes[50] = f64::NAN;
        let bars = bars_from_closes(&closes);
        let v = volatility_metrics(&bars, &bars, 30).index.values();
        // the gap reads as a flat day, so every window after it still has a value
        assert!(v[30..].iter().all(|&x| x > 0.0));
        assert!(v[69] > 0.0 && v[69].is_finite());
    }

    #[test]
    fn keys_are_dates() {
        let bars = bars_from_closes(&[1.0, 2.0]);
        let m = volatility_metrics(&bars, &bars, 30);
        assert_eq!(m.index.keys(), vec!["2024-01-01".to_string(), "2024-01-02".to_string()]);
        assert_eq!(m.index.name, VOLATILITY);
        assert_eq!(m.ratio.name, VOLATILITY_RATIO);
    }
}
