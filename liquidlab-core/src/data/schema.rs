//! Named CSV schemas for every file handed between pipeline stages.
//!
//! Each dataset has a schema type that knows its header and validates it on
//! load, so a file in the wrong layout fails with a named error instead of
//! silently shifting columns.

use crate::domain::{InstitutionalFlow, MetricSeries, PolicyRates, PolicyRow, PriceBar};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("unexpected header in {}: {found:?}", path.display())]
    UnexpectedHeader { path: PathBuf, found: Vec<String> },

    #[error("missing required column '{column}' in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("expected {expected} columns in {}, found {found}", path.display())]
    ColumnCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("non-numeric value '{value}' in column '{column}' at row {row} of {}", path.display())]
    NonNumeric {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid date '{value}' at row {row} of {}", path.display())]
    InvalidDate {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("no data rows in {}", path.display())]
    Empty { path: PathBuf },
}

impl SchemaError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Parse a numeric cell. Empty cells are `NaN`; anything else must parse.
fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        Some(f64::NAN)
    } else {
        cell.parse::<f64>().ok()
    }
}

/// Format a value for output. `NaN` is written as an empty cell.
fn format_number(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

/// Parse the date part of a cell such as `2024-01-02` or `2024-01-02 00:00:00+05:30`.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    let head = cell.split([' ', 'T']).next().unwrap_or(cell);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn reader(path: &Path) -> Result<csv::Reader<std::fs::File>, SchemaError> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SchemaError::csv(path, e))
}

fn read_records(path: &Path) -> Result<Vec<csv::StringRecord>, SchemaError> {
    reader(path)?
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SchemaError::csv(path, e))
}

fn record_strings(record: &csv::StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// Daily price file: `Date,Close,High,Low,Open,Volume`.
pub struct PriceSchema;

impl PriceSchema {
    pub const HEADER: [&'static str; 6] = ["Date", "Close", "High", "Low", "Open", "Volume"];

    /// Lines taken up by the provider's three-line export header
    /// (`Price,...` / `Ticker,...` / `Date,...`).
    pub const EXPORT_HEADER_ROWS: usize = 3;

    fn is_canonical(record: &csv::StringRecord) -> bool {
        record.len() == Self::HEADER.len()
            && record
                .iter()
                .zip(Self::HEADER)
                .all(|(found, expected)| found.trim() == expected)
    }

    fn is_export_header(records: &[csv::StringRecord]) -> bool {
        let first_cell = |i: usize| {
            records
                .get(i)
                .and_then(|r| r.get(0))
                .map(str::trim)
                .unwrap_or("")
        };
        first_cell(0) == "Price" && first_cell(1) == "Ticker" && first_cell(2) == "Date"
    }

    /// Load a price file in either the canonical layout or the provider export
    /// layout. Any other header is rejected.
    pub fn read_raw(path: &Path) -> Result<Vec<PriceBar>, SchemaError> {
        let records = read_records(path)?;
        let first = records
            .first()
            .ok_or_else(|| SchemaError::Empty { path: path.into() })?;

        let skip = if Self::is_canonical(first) {
            1
        } else if Self::is_export_header(&records) {
            Self::EXPORT_HEADER_ROWS
        } else {
            return Err(SchemaError::UnexpectedHeader {
                path: path.into(),
                found: record_strings(first),
            });
        };

        Self::parse_rows(path, &records[skip.min(records.len())..], skip)
    }

    /// Load a price file that must be in the canonical layout.
    pub fn read(path: &Path) -> Result<Vec<PriceBar>, SchemaError> {
        let records = read_records(path)?;
        let first = records
            .first()
            .ok_or_else(|| SchemaError::Empty { path: path.into() })?;
        if !Self::is_canonical(first) {
            return Err(SchemaError::UnexpectedHeader {
                path: path.into(),
                found: record_strings(first),
            });
        }
        Self::parse_rows(path, &records[1..], 1)
    }

    fn parse_rows(
        path: &Path,
        records: &[csv::StringRecord],
        first_line: usize,
    ) -> Result<Vec<PriceBar>, SchemaError> {
        let mut bars = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let row = first_line + i + 1;
            let cell = |j: usize| record.get(j).unwrap_or("");

            let date = parse_date(cell(0)).ok_or_else(|| SchemaError::InvalidDate {
                path: path.into(),
                row,
                value: cell(0).to_string(),
            })?;

            let mut prices = [0.0; 4];
            for (k, price) in prices.iter_mut().enumerate() {
                let column = k + 1;
                *price = parse_number(cell(column)).ok_or_else(|| SchemaError::NonNumeric {
                    path: path.into(),
                    row,
                    column: Self::HEADER[column].to_string(),
                    value: cell(column).to_string(),
                })?;
            }
            let [close, high, low, open] = prices;

            bars.push(PriceBar {
                date,
                close,
                high,
                low,
                open,
                volume: parse_number(cell(5)).unwrap_or(f64::NAN),
            });
        }

        Ok(bars)
    }

    pub fn write(path: &Path, bars: &[PriceBar]) -> Result<(), SchemaError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| SchemaError::csv(path, e))?;
        writer
            .write_record(Self::HEADER)
            .map_err(|e| SchemaError::csv(path, e))?;
        for bar in bars {
            writer
                .write_record([
                    bar.date.format("%Y-%m-%d").to_string(),
                    format_number(bar.close),
                    format_number(bar.high),
                    format_number(bar.low),
                    format_number(bar.open),
                    format_number(bar.volume),
                ])
                .map_err(|e| SchemaError::csv(path, e))?;
        }
        writer.flush().map_err(|e| SchemaError::io(path, e))?;
        Ok(())
    }
}

/// Metric file: a key column followed by named value columns.
pub struct MetricSchema;

impl MetricSchema {
    /// Load the column named `column`, keyed by the first column.
    pub fn read_column(path: &Path, column: &str) -> Result<MetricSeries, SchemaError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| SchemaError::csv(path, e))?;

        let headers = rdr.headers().map_err(|e| SchemaError::csv(path, e))?.clone();
        let idx = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| SchemaError::MissingColumn {
                path: path.into(),
                column: column.to_string(),
            })?;

        let mut series = MetricSeries::new(column);
        for (i, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| SchemaError::csv(path, e))?;
            let raw = record.get(idx).unwrap_or("");
            let value = parse_number(raw).ok_or_else(|| SchemaError::NonNumeric {
                path: path.into(),
                row: i + 2,
                column: column.to_string(),
                value: raw.to_string(),
            })?;
            series.push(record.get(0).unwrap_or("").to_string(), value);
        }

        if series.is_empty() {
            return Err(SchemaError::Empty { path: path.into() });
        }
        Ok(series)
    }

    /// Write `key_header` plus one column per series. Keys come from the
    /// first series; the others are aligned by position.
    pub fn write(
        path: &Path,
        key_header: &str,
        series: &[&MetricSeries],
    ) -> Result<(), SchemaError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| SchemaError::csv(path, e))?;

        let mut header = vec![key_header.to_string()];
        header.extend(series.iter().map(|s| s.name.clone()));
        writer
            .write_record(&header)
            .map_err(|e| SchemaError::csv(path, e))?;

        let rows = series.first().map(|s| s.len()).unwrap_or(0);
        for i in 0..rows {
            let mut record = vec![series[0].points[i].key.clone()];
            record.extend(
                series
                    .iter()
                    .map(|s| format_number(s.points.get(i).map_or(f64::NAN, |p| p.value))),
            );
            writer
                .write_record(&record)
                .map_err(|e| SchemaError::csv(path, e))?;
        }
        writer.flush().map_err(|e| SchemaError::io(path, e))?;
        Ok(())
    }
}

/// Scraped FII/DII table: a header row, then eight positional columns
/// `MONTH, FII Buy, FII Sell, FII Net, DII Buy, DII Sell, DII Net, NIFTY`.
pub struct FlowSchema;

impl FlowSchema {
    pub const WIDTH: usize = 8;
    const MONTH: usize = 0;
    const FII_NET: usize = 3;
    const DII_NET: usize = 6;

    /// Load the monthly net flows. Rows whose FII or DII net cell is not a
    /// number (repeated header rows, totals, blanks) are dropped.
    pub fn read(path: &Path) -> Result<Vec<InstitutionalFlow>, SchemaError> {
        let records = read_records(path)?;
        let header = records
            .first()
            .ok_or_else(|| SchemaError::Empty { path: path.into() })?;
        if header.len() != Self::WIDTH {
            return Err(SchemaError::ColumnCount {
                path: path.into(),
                expected: Self::WIDTH,
                found: header.len(),
            });
        }

        let number = |cell: Option<&str>| {
            cell.map(str::trim)
                .filter(|c| !c.is_empty())
                .and_then(|c| c.parse::<f64>().ok())
        };

        Ok(records[1..]
            .iter()
            .filter_map(|record| {
                let fii_net = number(record.get(Self::FII_NET))?;
                let dii_net = number(record.get(Self::DII_NET))?;
                Some(InstitutionalFlow {
                    month: record.get(Self::MONTH).unwrap_or("").to_string(),
                    fii_net,
                    dii_net,
                })
            })
            .collect())
    }
}

/// Scraped policy-rate table read without a header: `Policy, Rate`.
pub struct PolicySchema;

impl PolicySchema {
    pub const HEADER: [&'static str; 2] = ["Repo Rate", "Reverse Repo Rate"];

    pub fn read(path: &Path) -> Result<Vec<PolicyRow>, SchemaError> {
        let records = read_records(path)?;
        if records.is_empty() {
            return Err(SchemaError::Empty { path: path.into() });
        }
        Ok(records
            .iter()
            .map(|r| PolicyRow {
                policy: r.get(0).unwrap_or("").to_string(),
                rate: r.get(1).unwrap_or("").to_string(),
            })
            .collect())
    }

    pub fn write(path: &Path, rates: &PolicyRates) -> Result<(), SchemaError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| SchemaError::csv(path, e))?;
        writer
            .write_record(Self::HEADER)
            .map_err(|e| SchemaError::csv(path, e))?;
        writer
            .write_record([
                format_number(rates.repo_rate),
                format_number(rates.reverse_repo_rate),
            ])
            .map_err(|e| SchemaError::csv(path, e))?;
        writer.flush().map_err(|e| SchemaError::io(path, e))?;
        Ok(())
    }
}
