//! Market data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over time-series sources so the collector
//! can be driven by Yahoo Finance in production and by an in-memory mock in tests.

use crate::domain::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for market data fetches.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("invalid date range for {symbol}: {start} .. {end}")]
    InvalidRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Where the bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Fixture,
}

/// Result of a successful fetch for a single symbol.
///
/// `bars` may be empty: the provider answered but had nothing in the range.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
}

/// Trait for daily time-series providers.
///
/// `start` is inclusive and `end` is exclusive.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over `[start, end)`.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}
