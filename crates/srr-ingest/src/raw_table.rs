//! Raw delimited input as an in-memory table of strings.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;

use srr_model::{RefineError, Result};

/// A raw input table: the header row plus one string row per record.
///
/// Cells are trimmed and BOM-stripped on ingest; rows are padded or
/// truncated to the header width so lookups by header never go out of
/// bounds. Each row is owned exclusively by whoever is normalizing it.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    index: BTreeMap<String, usize>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

impl RawTable {
    /// Parse raw CSV text into a table.
    ///
    /// The first non-empty row is the header row; fully-empty rows are
    /// skipped. An input with no data rows parses to an empty table.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|error| RefineError::Message(format!("read record: {error}")))?;
            let row: Vec<String> = record.iter().map(normalize_cell).collect();
            if row.iter().all(|value| value.is_empty()) {
                continue;
            }
            raw_rows.push(row);
        }
        if raw_rows.is_empty() {
            return Ok(Self::default());
        }
        let headers: Vec<String> = raw_rows[0].iter().map(|value| normalize_header(value)).collect();
        let index = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (header.clone(), idx))
            .collect();
        let mut rows = Vec::with_capacity(raw_rows.len() - 1);
        for record in raw_rows.iter().skip(1) {
            let mut row = Vec::with_capacity(headers.len());
            for idx in 0..headers.len() {
                row.push(record.get(idx).cloned().unwrap_or_default());
            }
            rows.push(row);
        }
        tracing::debug!(
            rows = rows.len(),
            columns = headers.len(),
            "parsed raw table"
        );
        Ok(Self {
            headers,
            rows,
            index,
        })
    }

    /// Read and parse a CSV file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// The header row, in input order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header in the row layout, by exact spelling.
    #[must_use]
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.index.get(header).copied()
    }

    /// Cell value at (`row`, `header`); `None` when the column does not
    /// exist. Present cells may be empty strings.
    #[must_use]
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let col = self.column_index(header)?;
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }
}
