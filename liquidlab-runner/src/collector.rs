//! Collector pipeline: download the configured tickers and scrape the
//! configured pages, one CSV per source.
//!
//! Every source gets exactly one attempt. A failure is reported through the
//! progress callback and the run moves on to the next source; the summary
//! lists what failed.

use crate::config::{ConfigError, PageRenderer, PipelineConfig, ScrapeConfig, TickerConfig};
use crate::error::{create_dir, PipelineError};
use chrono::NaiveDate;
use liquidlab_core::data::{
    extract_first_table, DataError, DataProvider, HttpPageSource, PageSource, PriceSchema,
    SchemaError, ScrapeError,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Why a single source failed.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// What happened to one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Written { path: PathBuf, rows: usize },
    /// The provider answered with no rows; nothing was written.
    Empty,
}

/// Progress callback for the collector.
pub trait DownloadProgress {
    /// Called when starting to fetch a source.
    fn on_start(&self, source: &str, index: usize, total: usize);

    /// Called when a source completes.
    fn on_complete(
        &self,
        source: &str,
        index: usize,
        total: usize,
        result: &Result<SourceOutcome, CollectError>,
    );

    /// Called when every source has been attempted.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that logs through `tracing`.
pub struct TracingProgress;

impl DownloadProgress for TracingProgress {
    fn on_start(&self, source: &str, index: usize, total: usize) {
        info!("[{}/{}] fetching {source}", index + 1, total);
    }

    fn on_complete(
        &self,
        source: &str,
        _index: usize,
        _total: usize,
        result: &Result<SourceOutcome, CollectError>,
    ) {
        match result {
            Ok(SourceOutcome::Written { path, rows }) => {
                info!(rows, file = %path.display(), "{source} saved")
            }
            Ok(SourceOutcome::Empty) => info!("{source}: no data returned, skipped"),
            Err(e) => warn!(error = %e, "error collecting {source}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        info!("collection complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Summary of a collection run.
#[derive(Debug)]
pub struct CollectSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, CollectError)>,
}

impl CollectSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Page source selected by `config.renderer`.
///
/// Asking for the browser in a build without the `browser` feature is an
/// error rather than a quiet fallback to plain HTTP.
pub fn page_source(config: &PipelineConfig) -> Result<Box<dyn PageSource>, ScrapeError> {
    match config.renderer {
        PageRenderer::Http => Ok(Box::new(HttpPageSource::new()?)),
        PageRenderer::Browser => browser_source(config),
    }
}

#[cfg(feature = "browser")]
fn browser_source(config: &PipelineConfig) -> Result<Box<dyn PageSource>, ScrapeError> {
    let wait = std::time::Duration::from_secs(config.render_wait_secs);
    Ok(Box::new(liquidlab_core::data::ChromePageSource::new(wait)))
}

#[cfg(not(feature = "browser"))]
fn browser_source(_config: &PipelineConfig) -> Result<Box<dyn PageSource>, ScrapeError> {
    Err(ScrapeError::Browser(
        "built without the `browser` feature; set renderer = \"http\"".into(),
    ))
}

/// Download one ticker's window and save it in the canonical price layout.
pub fn collect_ticker(
    config: &PipelineConfig,
    provider: &dyn DataProvider,
    ticker: &TickerConfig,
    today: NaiveDate,
) -> Result<SourceOutcome, CollectError> {
    let (start, end) = ticker.window(today)?;
    let fetched = provider.fetch(&ticker.symbol, start, end)?;
    if fetched.bars.is_empty() {
        return Ok(SourceOutcome::Empty);
    }

    let path = config.data_path(&ticker.output_file());
    PriceSchema::write(&path, &fetched.bars)?;
    Ok(SourceOutcome::Written {
        path,
        rows: fetched.bars.len(),
    })
}

/// Fetch a page, keep its first table, apply the configured trims and save it.
pub fn collect_page(
    config: &PipelineConfig,
    pages: &dyn PageSource,
    scrape: &ScrapeConfig,
) -> Result<SourceOutcome, CollectError> {
    let html = pages.fetch_html(&scrape.url)?;
    let mut table = extract_first_table(&html)?;
    if scrape.trim_last_row {
        table.drop_last_row();
    }
    if scrape.trim_last_column {
        table.drop_last_column();
    }

    let path = config.data_path(&scrape.output);
    table.write_csv(&path)?;
    Ok(SourceOutcome::Written {
        path,
        rows: table.rows.len(),
    })
}

/// Attempt every ticker, then every page.
///
/// Only a missing output directory aborts the run; per-source failures are
/// collected in the summary.
pub fn run_collect(
    config: &PipelineConfig,
    provider: &dyn DataProvider,
    pages: &dyn PageSource,
    progress: &dyn DownloadProgress,
    today: NaiveDate,
) -> Result<CollectSummary, PipelineError> {
    create_dir(&config.data_dir)?;

    let total = config.tickers.len() + config.scrapes.len();
    let mut succeeded = 0;
    let mut errors: Vec<(String, CollectError)> = Vec::new();

    let mut record = |name: &str, index: usize, result: Result<SourceOutcome, CollectError>| {
        progress.on_complete(name, index, total, &result);
        match result {
            Ok(_) => succeeded += 1,
            Err(e) => errors.push((name.to_string(), e)),
        }
    };

    for (i, ticker) in config.tickers.iter().enumerate() {
        progress.on_start(&ticker.name, i, total);
        let result = collect_ticker(config, provider, ticker, today);
        record(&ticker.name, i, result);
    }

    let offset = config.tickers.len();
    for (i, scrape) in config.scrapes.iter().enumerate() {
        progress.on_start(&scrape.name, offset + i, total);
        let result = collect_page(config, pages, scrape);
        record(&scrape.name, offset + i, result);
    }

    let failed = errors.len();
    progress.on_batch_complete(succeeded, failed, total);

    Ok(CollectSummary {
        total,
        succeeded,
        failed,
        errors,
    })
}
