//! First-table extraction from HTML.
//!
//! The scraped pages each carry the dataset in their first `<table>`. The
//! extractor flattens it into a header plus string rows:
//! - the first row is the header; when it has no `<th>` cells the header is
//!   the column positions `0, 1, ...`
//! - `colspan` repeats the cell text across the spanned columns
//! - numeric cells lose their thousands separators (`"1,234.5"` → `"1234.5"`)
//! - ragged rows are padded with empty cells to the widest row

use super::page::ScrapeError;
use super::schema::SchemaError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A header plus body rows of cell text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn drop_last_row(&mut self) {
        self.rows.pop();
    }

    pub fn drop_last_column(&mut self) {
        self.header.pop();
        for row in &mut self.rows {
            row.pop();
        }
    }

    /// Write header and rows as CSV.
    pub fn write_csv(&self, path: &Path) -> Result<(), SchemaError> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| SchemaError::csv(path, e))?;
        writer
            .write_record(&self.header)
            .map_err(|e| SchemaError::csv(path, e))?;
        for row in &self.rows {
            writer.write_record(row).map_err(|e| SchemaError::csv(path, e))?;
        }
        writer.flush().map_err(|e| SchemaError::io(path, e))?;
        Ok(())
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(e.to_string()))
}

/// Extract the first `<table>` of an HTML document.
pub fn extract_first_table(html: &str) -> Result<Table, ScrapeError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or(ScrapeError::NoTable)?;

    let mut header_row: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    let mut seen_row = false;

    for tr in table.select(&row_sel) {
        let cells: Vec<ElementRef> = tr.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }
        let is_header = cells.iter().all(|c| c.value().name() == "th");
        let expanded = expand_cells(&cells);

        // only the first row with cells can be the header
        let first = !seen_row;
        seen_row = true;
        if first && is_header {
            header_row = Some(expanded);
        } else {
            rows.push(expanded);
        }
    }

    let width = rows
        .iter()
        .map(Vec::len)
        .chain(header_row.as_ref().map(Vec::len))
        .max()
        .unwrap_or(0);

    let mut header = header_row.unwrap_or_else(|| (0..width).map(|i| i.to_string()).collect());
    header.resize(width, String::new());
    for row in &mut rows {
        row.resize(width, String::new());
    }

    Ok(Table { header, rows })
}

fn expand_cells(cells: &[ElementRef]) -> Vec<String> {
    let mut out = Vec::with_capacity(cells.len());
    for cell in cells {
        let text = clean_cell(&cell.text().collect::<String>());
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        for _ in 0..span {
            out.push(text.clone());
        }
    }
    out
}

/// Collapse whitespace and strip thousands separators from numeric text.
fn clean_cell(raw: &str) -> String {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.contains(',') {
        let stripped = text.replace(',', "");
        if stripped.parse::<f64>().is_ok() {
            return stripped;
        }
    }
    text
}
