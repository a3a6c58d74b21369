//! Feature extractor pipeline.
//!
//! Reads the raw CSVs written by the collector, normalizes the price exports
//! to the canonical layout, computes the five metric families and writes one
//! CSV per output (plus one chart per metric when enabled). The first load or
//! parse failure aborts the run.

use crate::charts::{self, Labels};
use crate::config::PipelineConfig;
use crate::error::{create_dir, PipelineError};
use liquidlab_core::data::{FlowSchema, MetricSchema, PolicySchema, PriceSchema};
use liquidlab_core::domain::{MetricSeries, PolicyRates};
use liquidlab_core::features::{
    institutional_flows, market_breadth, policy_rates, traded_volume, volatility_metrics,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What a feature run produced.
#[derive(Debug, Clone)]
pub struct FeatureSummary {
    pub files_written: Vec<PathBuf>,
    pub charts_written: Vec<PathBuf>,
    pub rates: PolicyRates,
}

/// Rewrite a raw price export in the canonical `Date,Close,High,Low,Open,Volume` layout.
///
/// Returns the number of rows written.
pub fn preprocess(input: &Path, output: &Path) -> Result<usize, PipelineError> {
    let bars = PriceSchema::read_raw(input)?;
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir(dir)?;
    }
    PriceSchema::write(output, &bars)?;
    info!(input = %input.display(), output = %output.display(), rows = bars.len(), "preprocessed price file");
    Ok(bars.len())
}

/// Collects chart renders; failures are logged and skipped.
struct ChartSink<'a> {
    config: &'a PipelineConfig,
    written: Vec<PathBuf>,
}

impl<'a> ChartSink<'a> {
    fn new(config: &'a PipelineConfig) -> Self {
        Self {
            config,
            written: Vec::new(),
        }
    }

    fn render(
        &mut self,
        file: &str,
        draw: impl FnOnce(&Path) -> Result<(), charts::ChartError>,
    ) {
        if !self.config.charts {
            return;
        }
        let path = self.config.chart_path(file);
        match charts::prepare(&path).and_then(|()| draw(&path)) {
            Ok(()) => {
                info!(chart = %path.display(), "chart written");
                self.written.push(path);
            }
            Err(e) => warn!(chart = %path.display(), error = %e, "chart skipped"),
        }
    }
}

fn write_metrics(
    path: PathBuf,
    key_header: &str,
    series: &[&MetricSeries],
    written: &mut Vec<PathBuf>,
) -> Result<(), PipelineError> {
    MetricSchema::write(&path, key_header, series)?;
    info!(file = %path.display(), rows = series.first().map_or(0, |s| s.len()), "metrics written");
    written.push(path);
    Ok(())
}

/// Run the whole feature extraction.
pub fn run_features(config: &PipelineConfig) -> Result<FeatureSummary, PipelineError> {
    let files = &config.files;
    let windows = &config.features;
    create_dir(&config.data_dir)?;

    let nifty_path = config.data_path(&files.nifty_processed);
    let midcap_path = config.data_path(&files.midcap_processed);
    preprocess(&config.data_path(&files.nifty_raw), &nifty_path)?;
    preprocess(&config.data_path(&files.midcap_raw), &midcap_path)?;

    let nifty = PriceSchema::read(&nifty_path)?;
    let midcap = PriceSchema::read(&midcap_path)?;
    let flows = FlowSchema::read(&config.data_path(&files.fii_dii))?;
    let policy = PolicySchema::read(&config.data_path(&files.rbi_policy))?;

    let mut written = Vec::new();
    let mut sink = ChartSink::new(config);

    // Volatility
    let vol = volatility_metrics(&nifty, &midcap, windows.volatility_window);
    write_metrics(
        config.data_path(&files.nifty_volatility),
        "Date",
        &[&vol.index, &vol.ratio],
        &mut written,
    )?;
    write_metrics(
        config.data_path(&files.midcap_volatility),
        "Date",
        &[&vol.midcap],
        &mut written,
    )?;
    sink.render("volatility_metrics.png", |path| {
        charts::line_chart(
            path,
            Labels {
                title: "30-Day Rolling Volatility",
                x: "Date",
                y: "Volatility",
            },
            &[
                ("Nifty 30-Day Volatility", &vol.index),
                ("Midcap 30-Day Volatility", &vol.midcap),
            ],
            false,
        )
    });

    // Traded volume
    let nifty_volume = traded_volume(&nifty, windows.volume_window);
    let midcap_volume = traded_volume(&midcap, windows.volume_window);
    write_metrics(
        config.data_path(&files.nifty_volume),
        "Date",
        &[&nifty_volume],
        &mut written,
    )?;
    write_metrics(
        config.data_path(&files.midcap_volume),
        "Date",
        &[&midcap_volume],
        &mut written,
    )?;
    sink.render("traded_volume.png", |path| {
        charts::line_chart(
            path,
            Labels {
                title: "30-Day Average Traded Volume",
                x: "Date",
                y: "Volume",
            },
            &[
                ("Nifty Average Volume", &nifty_volume),
                ("Midcap Average Volume", &midcap_volume),
            ],
            false,
        )
    });

    // Institutional flows
    let flow = institutional_flows(&flows);
    write_metrics(
        config.data_path(&files.institutional_flows),
        "MONTH",
        &[&flow.fii, &flow.dii, &flow.ratio],
        &mut written,
    )?;
    sink.render("institutional_flows.png", |path| {
        charts::line_chart(
            path,
            Labels {
                title: "Institutional Flows (FII vs DII)",
                x: "Month",
                y: "Net Flow (INR Crore)",
            },
            &[("FII Net Flow", &flow.fii), ("DII Net Flow", &flow.dii)],
            true,
        )
    });

    // Market breadth
    let breadth = market_breadth(&nifty, windows.breadth_window, windows.breadth_skip_rows);
    write_metrics(
        config.data_path(&files.market_breadth),
        "Date",
        &[&breadth],
        &mut written,
    )?;
    sink.render("market_breadth.png", |path| {
        charts::line_chart(
            path,
            Labels {
                title: "Advance-Decline Ratio",
                x: "Date",
                y: "Ratio",
            },
            &[("Advance-Decline Ratio", &breadth)],
            false,
        )
    });

    // Interest rates
    let rates = policy_rates(&policy)?;
    let rates_path = config.data_path(&files.interest_rates);
    PolicySchema::write(&rates_path, &rates)?;
    info!(
        file = %rates_path.display(),
        repo = rates.repo_rate,
        reverse_repo = rates.reverse_repo_rate,
        "policy rates written"
    );
    written.push(rates_path);
    sink.render("interest_rates.png", |path| {
        charts::bar_chart(
            path,
            "Interest Rate Metrics",
            "Rate (%)",
            &[
                ("Repo Rate", rates.repo_rate),
                ("Reverse Repo Rate", rates.reverse_repo_rate),
            ],
        )
    });

    info!(files = written.len(), "feature engineering completed");
    Ok(FeatureSummary {
        files_written: written,
        charts_written: sink.written,
        rates,
    })
}
