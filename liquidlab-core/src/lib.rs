//! liquidlab core: domain types, data providers, CSV schemas, indicators, allocation math.
//!
//! This crate holds everything that does not touch the filesystem layout or
//! the chart renderer:
//! - Domain types (price bars, metric series, risk tolerance, policy rates)
//! - Market data provider trait and the Yahoo Finance chart client
//! - HTML page sources and first-table extraction
//! - Named CSV schemas validated at load time
//! - Trailing rolling-window indicators
//! - Feature transforms (volatility, volume, flows, breadth, rates)
//! - Min-max normalization, liquidity score and cash allocation

pub mod allocation;
pub mod data;
pub mod domain;
pub mod features;
pub mod indicators;
