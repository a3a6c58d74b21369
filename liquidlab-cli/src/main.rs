//! liquidlab CLI: collect, preprocess, features and allocate commands.
//!
//! Commands:
//! - `collect`: download the index tickers and scrape the flow/policy pages
//! - `preprocess`: rewrite one raw price export in the canonical layout
//! - `features`: compute the metric CSVs (and charts) from collected data
//! - `allocate`: score liquidity and recommend a cash allocation
//! - `run`: all three pipelines in order

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use liquidlab_core::data::YahooProvider;
use liquidlab_core::domain::RiskTolerance;
use liquidlab_runner::{
    page_source, preprocess, run_allocation, run_allocation_for, run_collect, run_features,
    CollectSummary, PipelineConfig, TracingProgress,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "liquidlab",
    about = "liquidlab: market liquidity metrics and cash allocation"
)]
struct Cli {
    /// Path to a TOML config file. Defaults reproduce the standard layout.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the configured tickers and scrape the configured pages.
    Collect,
    /// Rewrite a raw price export as Date,Close,High,Low,Open,Volume.
    Preprocess {
        /// Raw price CSV.
        input: PathBuf,
        /// Destination CSV.
        output: PathBuf,
    },
    /// Compute volatility, volume, flow, breadth and rate metrics.
    Features,
    /// Compute the liquidity score and recommended cash allocation.
    Allocate {
        /// Risk tolerance: high, medium or low.
        #[arg(long, default_value = "medium")]
        risk_tolerance: String,

        /// Evaluate all three tolerances.
        #[arg(long, default_value_t = false, conflicts_with = "risk_tolerance")]
        all: bool,
    },
    /// Collect, extract features, then allocate for every tolerance.
    Run,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Collect => {
            collect(&config)?;
            Ok(())
        }
        Commands::Preprocess { input, output } => {
            let rows = preprocess(&input, &output)
                .with_context(|| format!("failed to preprocess {}", input.display()))?;
            info!(rows, "preprocessing complete");
            Ok(())
        }
        Commands::Features => {
            run_features(&config).context("feature extraction failed")?;
            Ok(())
        }
        Commands::Allocate {
            risk_tolerance,
            all,
        } => {
            if all {
                run_allocation(&config, &RiskTolerance::ALL).context("allocation failed")?;
            } else {
                run_allocation_for(&config, &risk_tolerance).context("allocation failed")?;
            }
            Ok(())
        }
        Commands::Run => {
            let summary = collect(&config)?;
            if !summary.all_succeeded() {
                warn!(
                    failed = summary.failed,
                    "some sources failed; continuing with the files on disk"
                );
            }
            run_features(&config).context("feature extraction failed")?;
            run_allocation(&config, &RiskTolerance::ALL).context("allocation failed")?;
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn collect(config: &PipelineConfig) -> Result<CollectSummary> {
    let provider = YahooProvider::new().context("failed to build HTTP client")?;
    let pages = page_source(config).context("failed to set up page source")?;
    let today: NaiveDate = chrono::Local::now().date_naive();

    let summary = run_collect(config, &provider, pages.as_ref(), &TracingProgress, today)
        .context("collection failed")?;
    for (source, err) in &summary.errors {
        error!("error for {source}: {err}");
    }
    Ok(summary)
}
