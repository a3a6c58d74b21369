//! Pipeline configuration.
//!
//! Stored as an optional TOML file. Every field has a default, and the
//! defaults reproduce the fixed layout the pipelines have always used: raw and
//! derived CSVs under `data_collections/`, charts under `screenshots/`, the
//! four index tickers and the three scraped pages.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One time series to download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Display name; also names the output file.
    pub name: String,
    /// Provider symbol, e.g. `^NSEI`.
    pub symbol: String,
    /// Fixed window start (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    /// Fixed window end (exclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Trailing window in years ending today. Used when `start`/`end` are absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_years: Option<u32>,
}

impl TickerConfig {
    pub fn fixed(name: &str, symbol: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            start: Some(start),
            end: Some(end),
            period_years: None,
        }
    }

    pub fn trailing(name: &str, symbol: &str, years: u32) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            start: None,
            end: None,
            period_years: Some(years),
        }
    }

    /// `[start, end)` to request, relative to `today` for trailing windows.
    pub fn window(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        match (self.start, self.end, self.period_years) {
            (Some(start), Some(end), _) if start < end => Ok((start, end)),
            (Some(start), Some(end), _) => Err(ConfigError::Invalid(format!(
                "ticker '{}': start {start} is not before end {end}",
                self.name
            ))),
            (None, None, Some(years)) if years > 0 => {
                let start = today
                    .checked_sub_months(Months::new(years * 12))
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!("ticker '{}': period out of range", self.name))
                    })?;
                Ok((start, today + chrono::Duration::days(1)))
            }
            _ => Err(ConfigError::Invalid(format!(
                "ticker '{}': set both start and end, or a positive period_years",
                self.name
            ))),
        }
    }

    /// `Nifty Midcap 100` → `nifty_midcap_100_data.csv`.
    pub fn output_file(&self) -> String {
        format!("{}_data.csv", self.name.replace(' ', "_").to_lowercase())
    }
}

/// One page whose first table is saved as CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub name: String,
    pub url: String,
    /// File name under `data_dir`.
    pub output: String,
    #[serde(default)]
    pub trim_last_row: bool,
    #[serde(default)]
    pub trim_last_column: bool,
}

/// How scraped pages are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageRenderer {
    /// Headless Chrome; waits `render_wait_secs` for page scripts to build the tables.
    #[default]
    Browser,
    /// Plain HTTP GET; only sees server-rendered markup.
    Http,
}

/// File names under `data_dir` read and written by the feature extractor and allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub nifty_raw: String,
    pub midcap_raw: String,
    pub nifty_processed: String,
    pub midcap_processed: String,
    pub fii_dii: String,
    pub rbi_policy: String,
    pub nifty_volatility: String,
    pub midcap_volatility: String,
    pub nifty_volume: String,
    pub midcap_volume: String,
    pub institutional_flows: String,
    pub market_breadth: String,
    pub interest_rates: String,
    pub allocation_report: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            nifty_raw: "nifty_50_data.csv".into(),
            midcap_raw: "nifty_midcap_100_data.csv".into(),
            nifty_processed: "processed_nifty_50_data.csv".into(),
            midcap_processed: "processed_midcap_100_data.csv".into(),
            fii_dii: "fii_dii_data.csv".into(),
            rbi_policy: "rbi_policy_rates.csv".into(),
            nifty_volatility: "nifty_volatility.csv".into(),
            midcap_volatility: "midcap_volatility.csv".into(),
            nifty_volume: "nifty_volume.csv".into(),
            midcap_volume: "midcap_volume.csv".into(),
            institutional_flows: "institutional_flows.csv".into(),
            market_breadth: "market_breadth.csv".into(),
            interest_rates: "interest_rates.csv".into(),
            allocation_report: "cash_allocation.json".into(),
        }
    }
}

/// Rolling window sizes and row offsets for the feature transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub volatility_window: usize,
    pub volume_window: usize,
    pub breadth_window: usize,
    /// Leading price rows ignored by the breadth indicator.
    pub breadth_skip_rows: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            volatility_window: 30,
            volume_window: 30,
            breadth_window: 30,
            breadth_skip_rows: 27,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub charts_dir: PathBuf,
    /// Render PNG charts alongside the CSV outputs.
    pub charts: bool,
    /// Seconds the headless browser waits for page scripts before reading the page.
    pub render_wait_secs: u64,
    pub renderer: PageRenderer,
    pub tickers: Vec<TickerConfig>,
    pub scrapes: Vec<ScrapeConfig>,
    pub files: FilesConfig,
    pub features: FeatureConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        let (start, end) = (date(2022, 2, 1), date(2025, 2, 1));

        Self {
            data_dir: PathBuf::from("data_collections"),
            charts_dir: PathBuf::from("screenshots"),
            charts: true,
            render_wait_secs: 5,
            renderer: PageRenderer::default(),
            tickers: vec![
                TickerConfig::fixed("Nifty 50", "^NSEI", start, end),
                TickerConfig::fixed("Nifty Midcap 100", "^NSEMDCP50", start, end),
                TickerConfig::fixed("Nifty Next 50", "^NSMIDCP", start, end),
                TickerConfig::trailing("INDIA VIX", "^INDIAVIX", 3),
            ],
            scrapes: vec![
                ScrapeConfig {
                    name: "FII/DII".into(),
                    url: "https://www.niftytrader.in/fii-dii-data".into(),
                    output: "fii_dii_data.csv".into(),
                    trim_last_row: false,
                    trim_last_column: false,
                },
                ScrapeConfig {
                    name: "RBI policy rates".into(),
                    url: "https://rbi.org.in/".into(),
                    output: "rbi_policy_rates.csv".into(),
                    trim_last_row: false,
                    trim_last_column: false,
                },
                ScrapeConfig {
                    name: "SEBI PMS & mutual fund".into(),
                    url: "https://www.sebi.gov.in/sebiweb/other/OtherAction.do?doMfd=yes&type=1"
                        .into(),
                    output: "sebi_pms_data.csv".into(),
                    trim_last_row: true,
                    trim_last_column: true,
                },
            ],
            files: FilesConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject zero windows and tickers without a usable date window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.features;
        for (name, window) in [
            ("volatility_window", f.volatility_window),
            ("volume_window", f.volume_window),
            ("breadth_window", f.breadth_window),
        ] {
            if window == 0 {
                return Err(ConfigError::Invalid(format!("features.{name} must be >= 1")));
            }
        }

        // Any fixed date works as `today` here: only the shape of the window is checked.
        let reference = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        for ticker in &self.tickers {
            ticker.window(reference)?;
        }
        Ok(())
    }

    pub fn data_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn chart_path(&self, file: &str) -> PathBuf {
        self.charts_dir.join(file)
    }
}
