//! Integration tests for the feature extractor and allocator pipelines.
//!
//! Each test lays out a data directory in a tempdir with charts disabled and
//! drives the pipelines through the public runner API.

use chrono::{Duration, NaiveDate};
use liquidlab_core::allocation::AllocationError;
use liquidlab_core::data::{MetricSchema, SchemaError};
use liquidlab_core::domain::RiskTolerance;
use liquidlab_core::features::{ADVANCE_DECLINE, VOLATILITY};
use liquidlab_runner::{
    run_allocation, run_allocation_for, run_features, PipelineConfig, PipelineError,
};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: dir.join("data_collections"),
        charts_dir: dir.join("screenshots"),
        charts: false,
        ..PipelineConfig::default()
    }
}

fn write(config: &PipelineConfig, file: &str, contents: &str) {
    fs::create_dir_all(&config.data_dir).unwrap();
    fs::write(config.data_path(file), contents).unwrap();
}

/// Price rows with a gentle oscillation so returns are never constant.
fn price_rows(n: usize, base: f64) -> String {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut out = String::new();
    for i in 0..n {
        let date = start + Duration::days(i as i64);
        let close = base + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
        let open = base + ((i as f64 - 0.5) * 0.7).sin() * 5.0 + i as f64 * 0.1;
        let volume = if i % 10 == 3 { 0 } else { 1000 + i * 10 };
        writeln!(
            out,
            "{date},{close:.4},{:.4},{:.4},{open:.4},{volume}",
            close.max(open) + 1.0,
            close.min(open) - 1.0
        )
        .unwrap();
    }
    out
}

fn write_raw_inputs(config: &PipelineConfig, rows: usize) {
    // Provider export layout for the broad index, canonical layout for midcap.
    let nifty = format!(
        "Price,Close,High,Low,Open,Volume\n\
         Ticker,^NSEI,^NSEI,^NSEI,^NSEI,^NSEI\n\
         Date,,,,,\n{}",
        price_rows(rows, 22000.0)
    );
    let midcap = format!(
        "Date,Close,High,Low,Open,Volume\n{}",
        price_rows(rows, 50000.0)
    );
    write(config, &config.files.nifty_raw, &nifty);
    write(config, &config.files.midcap_raw, &midcap);

    write(
        config,
        &config.files.fii_dii,
        "MONTH,FII BUY,FII SELL,FII NET,DII BUY,DII SELL,DII NET,NIFTY\n\
         Dec 2024,100,150,-50,120,100,20,24000\n\
         Jan 2025,100,80,20,100,110,-10,23500\n\
         Feb 2025,100,100,0,100,100,0,22100\n",
    );
    write(
        config,
        &config.files.rbi_policy,
        "Policy Repo Rate,: 6.50%\nFixed Reverse Repo Rate,: 3.35%\n",
    );
}

fn write_metric(config: &PipelineConfig, file: &str, key: &str, column: &str, values: &[f64]) {
    let mut out = format!("{key},{column}\n");
    for (i, v) in values.iter().enumerate() {
        writeln!(out, "k{i},{v}").unwrap();
    }
    write(config, file, &out);
}

fn write_metrics(config: &PipelineConfig, values: &[f64]) {
    let f = config.files.clone();
    write_metric(config, &f.nifty_volatility, "Date", VOLATILITY, values);
    write_metric(config, &f.nifty_volume, "Date", "Average Volume", values);
    write_metric(config, &f.institutional_flows, "MONTH", "FII/DII Ratio", values);
    write_metric(config, &f.market_breadth, "Date", ADVANCE_DECLINE, values);
}

// ── Feature extractor ────────────────────────────────────────────────

#[test]
fn features_from_raw_exports() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_raw_inputs(&config, 60);

    let summary = run_features(&config).unwrap();
    assert_eq!(summary.files_written.len(), 7);
    assert!(summary.charts_written.is_empty());
    assert_eq!(summary.rates.repo_rate, 6.5);
    assert_eq!(summary.rates.reverse_repo_rate, 3.35);

    let processed = fs::read_to_string(config.data_path(&config.files.nifty_processed)).unwrap();
    assert!(processed.starts_with("Date,Close,High,Low,Open,Volume\n2024-01-01,"));

    let vol_path = config.data_path(&config.files.nifty_volatility);
    let vol = MetricSchema::read_column(&vol_path, VOLATILITY).unwrap();
    let values = vol.values();
    assert_eq!(values.len(), 60);
    assert!(values[..30].iter().all(|v| *v == 0.0));
    assert!(values[30..].iter().all(|v| *v > 0.0));

    let breadth = MetricSchema::read_column(
        &config.data_path(&config.files.market_breadth),
        ADVANCE_DECLINE,
    )
    .unwrap();
    assert_eq!(breadth.len(), 60 - 27);
    assert_eq!(breadth.keys()[0], "2024-01-28");

    let flows =
        fs::read_to_string(config.data_path(&config.files.institutional_flows)).unwrap();
    assert_eq!(
        flows,
        "MONTH,FII Net Flow,DII Net Flow,FII/DII Ratio\n\
         Dec 2024,-50,20,-2.5\n\
         Jan 2025,20,-10,-2\n\
         Feb 2025,0,0,0\n"
    );

    // The extractor's outputs are exactly what the allocator reads.
    let reports = run_allocation(&config, &[RiskTolerance::Medium]).unwrap();
    let cash = reports[0].cash_allocation_pct;
    assert!((0.0..=30.0).contains(&cash), "cash {cash}");
    assert!(config.data_path("cash_allocation.json").exists());
}

#[test]
fn features_abort_on_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_raw_inputs(&config, 40);
    fs::remove_file(config.data_path(&config.files.fii_dii)).unwrap();

    let err = run_features(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Schema(_)), "{err}");
}

#[test]
fn features_abort_without_policy_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_raw_inputs(&config, 40);
    write(&config, &config.files.rbi_policy, "Bank Rate,6.75%\n");

    let err = run_features(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Feature(_)), "{err}");
}

// ── Allocator ────────────────────────────────────────────────────────

#[test]
fn halfway_metrics_allocate_per_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    // min 0, max 1, latest 0.5
    write_metrics(&config, &[0.0, 1.0, 0.5]);

    let reports = run_allocation(&config, &RiskTolerance::ALL).unwrap();
    assert_eq!(reports.len(), 3);
    for report in &reports {
        assert!((report.score - 0.41).abs() < 1e-12);
    }
    assert!((reports[0].cash_allocation_pct - 11.8).abs() < 1e-9);
    assert!((reports[1].cash_allocation_pct - 17.7).abs() < 1e-9);
    assert!((reports[2].cash_allocation_pct - 29.5).abs() < 1e-9);
    assert_eq!(
        reports[1].summary(),
        "Recommended Cash Allocation (Medium Risk): 17.70%"
    );

    let json = fs::read_to_string(config.data_path("cash_allocation.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
    assert_eq!(parsed[2]["risk_tolerance"], "low");
}

#[test]
fn single_row_metrics_floor_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_metrics(&config, &[1.0]);

    let report = run_allocation_for(&config, "low").unwrap();
    assert!(report.score.is_nan());
    assert_eq!(report.cash_allocation_pct, 0.0);
}

#[test]
fn unknown_tolerance_is_rejected_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    let err = run_allocation_for(&config, "extreme").unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Allocation(AllocationError::InvalidRiskTolerance(_))
    ));
    assert!(err.to_string().contains("extreme"));
}

#[test]
fn missing_metric_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    write_metrics(&config, &[0.0, 1.0, 0.5]);
    fs::remove_file(config.data_path(&config.files.market_breadth)).unwrap();

    let err = run_allocation_for(&config, "medium").unwrap_err();
    assert!(matches!(err, PipelineError::Schema(SchemaError::Csv { .. })), "{err}");
}

#[test]
fn custom_layout_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let toml = format!(
        r#"
data_dir = "{}"
charts = false

[files]
nifty_volatility = "vol.csv"
"#,
        dir.path().join("custom").display()
    );
    let config = PipelineConfig::from_toml(&toml).unwrap();
    assert_eq!(config.files.nifty_volume, "nifty_volume.csv");

    write_metrics(&config, &[0.0, 1.0, 0.5]);
    assert!(dir.path().join("custom/vol.csv").exists());
    let report = run_allocation_for(&config, "medium").unwrap();
    assert!((report.cash_allocation_pct - 17.7).abs() < 1e-9);
}
