//! Liquidity score and cash allocation.
//!
//! The four metric columns are min-max normalized over their full length, the
//! most recent normalized value of each feeds a fixed weighted score, and the
//! score is mapped to a cash percentage by the risk tolerance's cap:
//!
//! ```text
//! score = 0.4*(1 - V) + 0.2*U*0.8 + 0.2*F*0.7 + 0.2*B*0.6
//! cash  = max(0, cap - score*cap)      cap = 20 | 30 | 50
//! ```
//!
//! A constant column normalizes to 0/0 = `NaN` and the score inherits it. This
//! is not guarded: `f64::max(0.0, NaN)` is 0, so such a run recommends 0% cash.

use crate::domain::{InvalidRiskTolerance, MetricSeries, RiskTolerance};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const VOLATILITY_WEIGHT: f64 = 0.4;
pub const VOLUME_WEIGHT: f64 = 0.2;
pub const FLOWS_WEIGHT: f64 = 0.2;
pub const BREADTH_WEIGHT: f64 = 0.2;

pub const VOLUME_DAMPING: f64 = 0.8;
pub const FLOWS_DAMPING: f64 = 0.7;
pub const BREADTH_DAMPING: f64 = 0.6;

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error(transparent)]
    InvalidRiskTolerance(#[from] InvalidRiskTolerance),

    #[error("metric '{0}' has no observations")]
    EmptySeries(String),
}

/// `(v - min) / (max - min)` over the whole column. `NaN` entries are ignored
/// for the extrema and stay `NaN`.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::NAN, f64::NAN), |(lo, hi), &v| (v.min(lo), v.max(hi)));
    values.iter().map(|&v| (v - min) / (max - min)).collect()
}

/// Same keys, normalized values.
pub fn normalize_series(series: &MetricSeries) -> MetricSeries {
    series.with_values(&normalize(&series.values()))
}

/// Most recent normalized value of each metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestMetrics {
    pub volatility: f64,
    pub volume: f64,
    pub institutional_flows: f64,
    pub market_breadth: f64,
}

impl LatestMetrics {
    /// Chart labels, in field order.
    pub const LABELS: [&'static str; 4] =
        ["Volatility", "Volume", "Institutional Flows", "Market Breadth"];

    /// Normalize each raw series and take its last value.
    pub fn from_series(
        volatility: &MetricSeries,
        volume: &MetricSeries,
        institutional_flows: &MetricSeries,
        market_breadth: &MetricSeries,
    ) -> Result<Self, AllocationError> {
        let latest = |s: &MetricSeries| {
            normalize_series(s)
                .latest()
                .ok_or_else(|| AllocationError::EmptySeries(s.name.clone()))
        };
        Ok(Self {
            volatility: latest(volatility)?,
            volume: latest(volume)?,
            institutional_flows: latest(institutional_flows)?,
            market_breadth: latest(market_breadth)?,
        })
    }

    pub fn values(&self) -> [f64; 4] {
        [
            self.volatility,
            self.volume,
            self.institutional_flows,
            self.market_breadth,
        ]
    }
}

/// Weighted liquidity score. High volatility lowers it; volume, flows and
/// breadth raise it, each damped by its own factor.
pub fn liquidity_score(m: &LatestMetrics) -> f64 {
    VOLATILITY_WEIGHT * (1.0 - m.volatility)
        + VOLUME_WEIGHT * m.volume * VOLUME_DAMPING
        + FLOWS_WEIGHT * m.institutional_flows * FLOWS_DAMPING
        + BREADTH_WEIGHT * m.market_breadth * BREADTH_DAMPING
}

/// Cash percentage for a score, floored at 0.
pub fn cash_allocation(score: f64, tolerance: RiskTolerance) -> f64 {
    let cap = tolerance.cap();
    f64::max(0.0, cap - score * cap)
}

/// Cash percentage for a score and a tolerance given as text.
pub fn allocate(score: f64, tolerance: &str) -> Result<f64, AllocationError> {
    let tolerance: RiskTolerance = tolerance.parse()?;
    Ok(cash_allocation(score, tolerance))
}
