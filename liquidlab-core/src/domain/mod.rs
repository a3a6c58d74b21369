//! Domain types shared by every pipeline stage.

pub mod bar;
pub mod flow;
pub mod metric;
pub mod rates;
pub mod risk;

pub use bar::PriceBar;
pub use flow::{InstitutionalFlow, PolicyRow};
pub use metric::{MetricPoint, MetricSeries};
pub use rates::PolicyRates;
pub use risk::{InvalidRiskTolerance, RiskTolerance};
