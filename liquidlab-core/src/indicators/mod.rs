//! Trailing rolling-window indicators over plain `f64` columns.
//!
//! All windows are trailing and right-aligned: output `i` covers inputs
//! `i + 1 - window ..= i`. Positions without enough observations are `NaN`;
//! callers decide the fill policy.

pub mod fill;
pub mod returns;
pub mod rolling;

pub use fill::{fill_nan, median, replace_infinite};
pub use returns::pct_change;
pub use rolling::{rolling_count, rolling_mean, rolling_std};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
