//! liquidlab runner: the three pipelines over the on-disk data layout.
//!
//! This crate builds on `liquidlab-core` to provide:
//! - Pipeline configuration (TOML, every field defaulted)
//! - The collector: ticker downloads and page scrapes to CSV
//! - The feature extractor: price preprocessing and the five metric families
//! - The allocator: liquidity score, cash allocation and the JSON report
//! - PNG charts for every metric

pub mod allocator;
pub mod charts;
pub mod collector;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;

pub use allocator::{evaluate, run_allocation, run_allocation_for, MetricFiles, MetricInputs};
pub use collector::{
    page_source, run_collect, CollectError, CollectSummary, DownloadProgress, SourceOutcome,
    TracingProgress,
};
pub use config::{
    ConfigError, FeatureConfig, FilesConfig, PageRenderer, PipelineConfig, ScrapeConfig,
    TickerConfig,
};
pub use error::PipelineError;
pub use extractor::{preprocess, run_features, FeatureSummary};
pub use report::{AllocationReport, SCHEMA_VERSION};
