//! Feature transforms: raw bars and scraped tables in, metric series out.
//!
//! Everything here is pure and in-memory. Reading and writing the CSV files
//! around these transforms belongs to the runner.

pub mod breadth;
pub mod flows;
pub mod rates;
pub mod volatility;
pub mod volume;

pub use breadth::{market_breadth, ADVANCE_DECLINE};
pub use flows::{institutional_flows, FlowMetrics, DII_NET_FLOW, FII_DII_RATIO, FII_NET_FLOW};
pub use rates::{extract_rate, policy_rates, FeatureError};
pub use volatility::{volatility_metrics, VolatilityMetrics, VOLATILITY, VOLATILITY_RATIO};
pub use volume::{clean_volume, traded_volume, AVERAGE_VOLUME};

use crate::domain::PriceBar;

/// Date keys of a bar slice, formatted `YYYY-MM-DD`.
pub(crate) fn date_keys(bars: &[PriceBar]) -> Vec<String> {
    bars.iter()
        .map(|b| b.date.format("%Y-%m-%d").to_string())
        .collect()
}
