//! Allocator pipeline: four metric CSVs in, cash allocation out.

use crate::charts;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::report::{self, AllocationReport, SCHEMA_VERSION};
use chrono::Utc;
use liquidlab_core::allocation::{cash_allocation, liquidity_score, LatestMetrics};
use liquidlab_core::data::MetricSchema;
use liquidlab_core::domain::{MetricSeries, RiskTolerance};
use liquidlab_core::features::{ADVANCE_DECLINE, AVERAGE_VOLUME, FII_DII_RATIO, VOLATILITY};
use std::path::PathBuf;
use tracing::{info, warn};

pub const CHART_FILE: &str = "cash_allocation_metrics.png";

/// The four metric files the allocator reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFiles {
    pub volatility: PathBuf,
    pub volume: PathBuf,
    pub institutional_flows: PathBuf,
    pub market_breadth: PathBuf,
}

impl MetricFiles {
    pub fn from_config(config: &PipelineConfig) -> Self {
        let f = &config.files;
        Self {
            volatility: config.data_path(&f.nifty_volatility),
            volume: config.data_path(&f.nifty_volume),
            institutional_flows: config.data_path(&f.institutional_flows),
            market_breadth: config.data_path(&f.market_breadth),
        }
    }
}

/// Raw metric columns, loaded by name.
#[derive(Debug, Clone)]
pub struct MetricInputs {
    pub volatility: MetricSeries,
    pub volume: MetricSeries,
    pub institutional_flows: MetricSeries,
    pub market_breadth: MetricSeries,
}

impl MetricInputs {
    pub fn load(files: &MetricFiles) -> Result<Self, PipelineError> {
        Ok(Self {
            volatility: MetricSchema::read_column(&files.volatility, VOLATILITY)?,
            volume: MetricSchema::read_column(&files.volume, AVERAGE_VOLUME)?,
            institutional_flows: MetricSchema::read_column(
                &files.institutional_flows,
                FII_DII_RATIO,
            )?,
            market_breadth: MetricSchema::read_column(&files.market_breadth, ADVANCE_DECLINE)?,
        })
    }

    pub fn latest(&self) -> Result<LatestMetrics, PipelineError> {
        Ok(LatestMetrics::from_series(
            &self.volatility,
            &self.volume,
            &self.institutional_flows,
            &self.market_breadth,
        )?)
    }

    pub fn dataset_hash(&self) -> String {
        report::dataset_hash(&[
            &self.volatility,
            &self.volume,
            &self.institutional_flows,
            &self.market_breadth,
        ])
    }
}

/// Score and allocation for one tolerance over already-loaded inputs.
pub fn evaluate(
    inputs: &MetricInputs,
    tolerance: RiskTolerance,
) -> Result<AllocationReport, PipelineError> {
    let latest = inputs.latest()?;
    let score = liquidity_score(&latest);
    Ok(AllocationReport {
        schema_version: SCHEMA_VERSION,
        risk_tolerance: tolerance,
        score,
        cash_allocation_pct: cash_allocation(score, tolerance),
        latest,
        dataset_hash: inputs.dataset_hash(),
        generated_at: Utc::now(),
    })
}

fn render_chart(config: &PipelineConfig, report: &AllocationReport) {
    if !config.charts {
        return;
    }
    let path = config.chart_path(CHART_FILE);
    let title = format!(
        "Liquidity Metrics and Cash Allocation (Risk Tolerance: {})",
        report.risk_tolerance.label()
    );
    let values = report.latest.values();
    let bars: Vec<(&str, f64)> = LatestMetrics::LABELS.iter().copied().zip(values).collect();

    let drawn = charts::prepare(&path)
        .and_then(|()| charts::bar_chart(&path, &title, "Normalized Score", &bars));
    match drawn {
        Ok(()) => info!(chart = %path.display(), "chart written"),
        Err(e) => warn!(chart = %path.display(), error = %e, "chart skipped"),
    }
}

/// Allocate for each tolerance in turn, log each result and write the JSON report.
///
/// The chart is redrawn per tolerance, so the file left on disk belongs to the
/// last one.
pub fn run_allocation(
    config: &PipelineConfig,
    tolerances: &[RiskTolerance],
) -> Result<Vec<AllocationReport>, PipelineError> {
    let inputs = MetricInputs::load(&MetricFiles::from_config(config))?;

    let mut reports = Vec::with_capacity(tolerances.len());
    for &tolerance in tolerances {
        let report = evaluate(&inputs, tolerance)?;
        if report.score.is_nan() {
            warn!(
                risk_tolerance = %tolerance,
                "liquidity score is NaN (a metric column is constant); allocation floors at 0"
            );
        }
        info!(score = report.score, "{}", report.summary());
        render_chart(config, &report);
        reports.push(report);
    }

    let path = config.data_path(&config.files.allocation_report);
    report::write_reports(&path, &reports)?;
    info!(file = %path.display(), "allocation report written");
    Ok(reports)
}

/// Allocate for a tolerance given as text. Unknown categories are rejected.
pub fn run_allocation_for(
    config: &PipelineConfig,
    tolerance: &str,
) -> Result<AllocationReport, PipelineError> {
    let tolerance: RiskTolerance = tolerance.parse()?;
    let mut reports = run_allocation(config, &[tolerance])?;
    reports
        .pop()
        .ok_or_else(|| PipelineError::Report(anyhow::anyhow!("no allocation produced")))
}
