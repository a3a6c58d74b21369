//! Institutional net flows and the FII/DII ratio.

use crate::domain::{InstitutionalFlow, MetricSeries};
use crate::indicators::{fill_nan, replace_infinite};

pub const FII_NET_FLOW: &str = "FII Net Flow";
pub const DII_NET_FLOW: &str = "DII Net Flow";
pub const FII_DII_RATIO: &str = "FII/DII Ratio";

/// Monthly flow series keyed by the month label.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowMetrics {
    pub fii: MetricSeries,
    pub dii: MetricSeries,
    pub ratio: MetricSeries,
}

/// FII net over DII net. A zero DII month has no ratio; undefined and
/// infinite ratios are reported as 0.
pub fn institutional_flows(flows: &[InstitutionalFlow]) -> FlowMetrics {
    let months: Vec<&str> = flows.iter().map(|f| f.month.as_str()).collect();
    let fii: Vec<f64> = flows.iter().map(|f| f.fii_net).collect();
    let dii: Vec<f64> = flows.iter().map(|f| f.dii_net).collect();

    let ratio: Vec<f64> = flows
        .iter()
        .map(|f| {
            if f.dii_net != 0.0 {
                f.fii_net / f.dii_net
            } else {
                f64::NAN
            }
        })
        .collect();
    let ratio = fill_nan(&replace_infinite(&ratio), 0.0);

    FlowMetrics {
        fii: MetricSeries::from_values(FII_NET_FLOW, months.iter(), fill_nan(&fii, 0.0)),
        dii: MetricSeries::from_values(DII_NET_FLOW, months.iter(), fill_nan(&dii, 0.0)),
        ratio: MetricSeries::from_values(FII_DII_RATIO, months.iter(), ratio),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(month: &str, fii_net: f64, dii_net: f64) -> InstitutionalFlow {
        InstitutionalFlow {
            month: month.into(),
            fii_net,
            dii_net,
        }
    }

    #[test]
    fn ratio_and_zero_dii() {
        let m = institutional_flows(&[
            flow("Jan 2025", -50.0, 100.0),
            flow("Feb 2025", 10.0, 0.0),
            flow("Mar 2025", 30.0, -15.0),
        ]);
        assert_eq!(m.ratio.values(), vec![-0.5, 0.0, -2.0]);
        assert_eq!(m.fii.values(), vec![-50.0, 10.0, 30.0]);
        assert_eq!(m.dii.keys()[1], "Feb 2025");
    }

    #[test]
    fn overflowing_ratio_is_zeroed() {
        let m = institutional_flows(&[flow("Jan", f64::MAX, 0.5)]);
        assert_eq!(m.ratio.values(), vec![0.0]);
    }

    #[test]
    fn no_months_no_points() {
        let m = institutional_flows(&[]);
        assert!(m.ratio.is_empty());
        assert_eq!(m.ratio.name, FII_DII_RATIO);
    }
}
