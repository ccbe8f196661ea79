#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use signalbench::domain::error::SignalbenchError;
pub use signalbench::domain::price::PricePoint;
use signalbench::domain::price::from_records;
use signalbench::ports::data_port::DataPort;
use signalbench::ports::report_port::{ReportContext, ReportPort};
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<PricePoint>, SignalbenchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalbenchError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => Ok(points.clone()),
            _ => Err(SignalbenchError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalbenchError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Records what it was asked to write instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub writes: RefCell<Vec<(String, String, Option<String>)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(
        &self,
        ctx: &ReportContext,
        output_path: Option<&str>,
    ) -> Result<(), SignalbenchError> {
        self.writes.borrow_mut().push((
            ctx.symbol.to_string(),
            ctx.strategy.key.clone(),
            output_path.map(str::to_string),
        ));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_point(index: usize, date_str: &str, close: f64) -> PricePoint {
    PricePoint::new(
        index,
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        close,
    )
}

/// Consecutive calendar days from `start`, one point per close.
pub fn daily_series(start: NaiveDate, closes: &[f64]) -> Vec<PricePoint> {
    from_records(
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (start + Duration::days(i as i64), c)),
    )
}

/// Deterministic oscillating series, always positive.
pub fn generate_series(start: NaiveDate, count: usize) -> Vec<PricePoint> {
    let closes: Vec<f64> = (0..count)
        .map(|i| {
            let t = i as f64;
            100.0 + 15.0 * (t / 11.0).sin() + 5.0 * (t / 3.0).cos() + t * 0.05
        })
        .collect();
    daily_series(start, &closes)
}
