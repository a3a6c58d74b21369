use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily price bar for an index.
///
/// Prices are `NaN` when the source left the cell empty. Volume is coerced:
/// anything that does not parse as a number becomes `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Close strictly above open.
    pub fn is_advance(&self) -> bool {
        self.close > self.open
    }

    /// Close strictly below open.
    pub fn is_decline(&self) -> bool {
        self.close < self.open
    }
}

/// Column selectors used by the feature transforms.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub fn volumes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            close,
            high: open.max(close),
            low: open.min(close),
            open,
            volume: 1000.0,
        }
    }

    #[test]
    fn flat_bar_is_neither_advance_nor_decline() {
        let b = bar(100.0, 100.0);
        assert!(!b.is_advance());
        assert!(!b.is_decline());
    }

    #[test]
    fn nan_close_is_neither_advance_nor_decline() {
        let b = bar(100.0, f64::NAN);
        assert!(!b.is_advance());
        assert!(!b.is_decline());
    }

    #[test]
    fn direction_follows_close_vs_open() {
        assert!(bar(100.0, 101.0).is_advance());
        assert!(bar(100.0, 99.0).is_decline());
    }
}
