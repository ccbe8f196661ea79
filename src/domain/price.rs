//! Price point and series representation.

use chrono::NaiveDate;

/// One close observation. `index` is the position inside the series it
/// belongs to and is reassigned by [`renumber`] after any filter or
/// aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PricePoint {
    pub index: usize,
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(index: usize, date: NaiveDate, close: f64) -> Self {
        Self { index, date, close }
    }
}

/// Rewrite every `index` field to its position in `points`.
pub fn renumber(points: &mut [PricePoint]) {
    for (i, point) in points.iter_mut().enumerate() {
        point.index = i;
    }
}

/// Build a dense series from `(date, close)` records in the given order.
pub fn from_records<I>(records: I) -> Vec<PricePoint>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(i, (date, close))| PricePoint::new(i, date, close))
        .collect()
}

/// (min close, max close) over the series, `None` when empty.
pub fn close_range(points: &[PricePoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let min = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let max = points
        .iter()
        .map(|p| p.close)
        .fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
