//! CSV file price data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row. The
//! date column (`date` or `ts`) and the `close` column are found by name, so
//! extra columns such as open/high/low/volume are ignored.

use crate::domain::error::SignalbenchError;
use crate::domain::price::{from_records, PricePoint};
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const DATE_COLUMNS: [&str; 2] = ["date", "ts"];
const CLOSE_COLUMN: &str = "close";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// `YYYY-MM-DD`, or a `YYYY-MM-DDTHH:MM:SS` timestamp truncated to its date.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<PricePoint>, SignalbenchError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SignalbenchError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| SignalbenchError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();

        let date_col = column_index(&headers, &DATE_COLUMNS).ok_or_else(|| {
            SignalbenchError::Data {
                reason: format!("{}: missing date column", path.display()),
            }
        })?;
        let close_col = column_index(&headers, &[CLOSE_COLUMN]).ok_or_else(|| {
            SignalbenchError::Data {
                reason: format!("{}: missing close column", path.display()),
            }
        })?;

        // Keyed by date: sorted, and a repeated date keeps its last row.
        let mut closes: BTreeMap<NaiveDate, f64> = BTreeMap::new();

        for (row, result) in rdr.records().enumerate() {
            let line = row + 2;
            let record = result.map_err(|e| SignalbenchError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default();
            let date = parse_date(date_str).ok_or_else(|| SignalbenchError::Data {
                reason: format!("line {}: invalid date '{}'", line, date_str),
            })?;

            let close_str = record.get(close_col).unwrap_or_default();
            let close: f64 = close_str
                .trim()
                .parse()
                .map_err(|e| SignalbenchError::Data {
                    reason: format!("line {}: invalid close value '{}': {}", line, close_str, e),
                })?;
            if !close.is_finite() || close <= 0.0 {
                return Err(SignalbenchError::Data {
                    reason: format!("line {}: close must be positive, got {}", line, close),
                });
            }

            closes.insert(date, close);
        }

        if closes.is_empty() {
            return Err(SignalbenchError::NoData {
                symbol: symbol.to_string(),
            });
        }

        tracing::debug!(symbol, rows = closes.len(), path = %path.display(), "loaded prices");
        Ok(from_records(closes))
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SignalbenchError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| SignalbenchError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                symbols.push(stem.to_string_lossy().into_owned());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
