//! Allocation report export.
//!
//! Every allocator run can be persisted as JSON next to the metric CSVs. The
//! report records the inputs' BLAKE3 hash so two reports can be compared
//! without re-reading the CSVs.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use liquidlab_core::allocation::LatestMetrics;
use liquidlab_core::domain::{MetricSeries, RiskTolerance};
use serde::Serialize;

/// Bump when the report layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Outcome of one allocation.
///
/// `NaN` values (a constant input column) serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub schema_version: u32,
    pub risk_tolerance: RiskTolerance,
    pub score: f64,
    pub cash_allocation_pct: f64,
    pub latest: LatestMetrics,
    pub dataset_hash: String,
    pub generated_at: DateTime<Utc>,
}

impl AllocationReport {
    /// Log line in the form `Recommended Cash Allocation (Medium Risk): 17.70%`.
    pub fn summary(&self) -> String {
        format!(
            "Recommended Cash Allocation ({} Risk): {:.2}%",
            self.risk_tolerance.label(),
            self.cash_allocation_pct
        )
    }
}

/// Deterministic BLAKE3 hash over the metric series, in the order given.
///
/// Covers each series' name, keys and raw value bits.
pub fn dataset_hash(series: &[&MetricSeries]) -> String {
    let mut hasher = blake3::Hasher::new();
    for s in series {
        hasher.update(s.name.as_bytes());
        for p in &s.points {
            hasher.update(p.key.as_bytes());
            hasher.update(&p.value.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Serialize reports to pretty JSON.
pub fn export_json(reports: &[AllocationReport]) -> Result<String> {
    serde_json::to_string_pretty(reports).context("failed to serialize allocation reports")
}

/// Write reports to `path`, replacing any previous file.
pub fn write_reports(path: &Path, reports: &[AllocationReport]) -> Result<()> {
    let json = export_json(reports)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write allocation report {}", path.display()))
}
