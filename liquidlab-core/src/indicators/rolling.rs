//! Rolling standard deviation, mean and event count.

/// Rolling sample standard deviation (n - 1 denominator).
///
/// A window yields a value only when all `window` observations are non-NaN,
/// so with a leading `NaN` (as produced by [`pct_change`](super::pct_change))
/// the first valid output is at index `window`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < window || window < 2 {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let ss: f64 = slice.iter().map(|v| (v - mean) * (v - mean)).sum();
        result[i] = (ss / (window - 1) as f64).sqrt();
    }

    result
}

/// Rolling mean over the non-NaN observations in each window.
///
/// Emits a value once the window holds at least `min_periods` observations.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    for i in 0..n {
        let start = (i + 1).saturating_sub(window);
        let (sum, count) = values[start..=i]
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count >= min_periods.max(1) {
            result[i] = sum / count as f64;
        }
    }

    result
}

/// Rolling count of `true` flags; `NaN` until the window is full.
pub fn rolling_count(flags: &[bool], window: usize) -> Vec<f64> {
    assert!(window >= 1, "rolling window must be >= 1");
    let n = flags.len();
    let mut result = vec![f64::NAN; n];

    if n < window {
        return result;
    }

    let mut count = flags[..window].iter().filter(|f| **f).count();
    result[window - 1] = count as f64;

    for i in window..n {
        if flags[i] {
            count += 1;
        }
        if flags[i - window] {
            count -= 1;
        }
        result[i] = count as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn std_3_basic() {
        let r = rolling_std(&[1.0, 2.0, 3.0, 4.0, 6.0], 3);
        assert!(r[0].is_nan());
        assert!(r[1].is_nan());
        // std(1,2,3) = 1.0
        assert_approx(r[2], 1.0, DEFAULT_EPSILON);
        assert_approx(r[3], 1.0, DEFAULT_EPSILON);
        // std(3,4,6): mean 13/3, ss = 14/3, var = 7/3
        assert_approx(r[4], (7.0f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn std_requires_full_window_of_observations() {
        let r = rolling_std(&[f64::NAN, 1.0, 2.0, 3.0, 4.0], 3);
        assert!(r[2].is_nan(), "window [NaN,1,2] must not produce a value");
        assert_approx(r[3], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_of_constant_window_is_zero() {
        let r = rolling_std(&[5.0; 4], 4);
        assert_approx(r[3], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_too_few_values() {
        assert!(rolling_std(&[1.0, 2.0], 30).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn mean_with_min_periods_one_starts_immediately() {
        let r = rolling_mean(&[2.0, 4.0, 6.0, 8.0], 3, 1);
        assert_approx(r[0], 2.0, DEFAULT_EPSILON);
        assert_approx(r[1], 3.0, DEFAULT_EPSILON);
        assert_approx(r[2], 4.0, DEFAULT_EPSILON);
        assert_approx(r[3], 6.0, DEFAULT_EPSILON);
    }

    #[test]
    fn mean_skips_nan_observations() {
        let r = rolling_mean(&[2.0, f64::NAN, 6.0], 3, 1);
        assert_approx(r[1], 2.0, DEFAULT_EPSILON);
        assert_approx(r[2], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn mean_all_nan_window_is_nan() {
        let r = rolling_mean(&[f64::NAN, f64::NAN], 2, 1);
        assert!(r.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn count_rolls_forward() {
        let flags = [true, false, true, true, false];
        let r = rolling_count(&flags, 3);
        assert!(r[0].is_nan());
        assert!(r[1].is_nan());
        assert_eq!(r[2], 2.0);
        assert_eq!(r[3], 2.0);
        assert_eq!(r[4], 2.0);
    }

    #[test]
    fn count_window_one_is_indicator() {
        let r = rolling_count(&[true, false], 1);
        assert_eq!(r, vec![1.0, 0.0]);
    }
}
