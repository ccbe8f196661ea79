//! Windowing and calendar resampling of a raw daily series.
//!
//! Weekly buckets are keyed by ISO week (the year and week number of the
//! Thursday of the week), monthly buckets by (year, month). Within a bucket
//! the last observation wins. Keys come from integer calendar fields only.

use crate::domain::price::{renumber, PricePoint};
use crate::domain::window::{Frequency, RangePreset, WindowSelector};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// Inclusive `(start, end)` bounds the selector resolves to over `raw`.
///
/// `None` when `raw` is empty or a custom window is missing a bound.
pub fn window_bounds(
    raw: &[PricePoint],
    selector: &WindowSelector,
) -> Option<(NaiveDate, NaiveDate)> {
    let first = raw.first()?.date;
    let last = raw.last()?.date;

    match selector.range {
        RangePreset::Custom => match (selector.custom_start, selector.custom_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        },
        preset => {
            let start = match preset.days() {
                Some(days) => (last - Duration::days(days)).max(first),
                None => first,
            };
            Some((start, last))
        }
    }
}

/// Produce the visible series for `selector`.
///
/// Empty input, a custom window with a missing bound, or `start > end` all
/// give an empty series.
pub fn resample(raw: &[PricePoint], selector: &WindowSelector) -> Vec<PricePoint> {
    let Some((start, end)) = window_bounds(raw, selector) else {
        return Vec::new();
    };
    if start > end {
        tracing::debug!(%start, %end, "window start after end, visible series is empty");
        return Vec::new();
    }

    let windowed: Vec<PricePoint> = raw
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .copied()
        .collect();

    let mut visible = match selector.frequency {
        Frequency::Daily => windowed,
        Frequency::Weekly => last_per_bucket(&windowed, |d| {
            let week = d.iso_week();
            (week.year(), week.week())
        }),
        Frequency::Monthly => last_per_bucket(&windowed, |d| (d.year(), d.month())),
    };
    renumber(&mut visible);

    tracing::debug!(
        %start,
        %end,
        frequency = %selector.frequency,
        points = visible.len(),
        "resampled series"
    );
    visible
}

fn last_per_bucket<F>(points: &[PricePoint], key: F) -> Vec<PricePoint>
where
    F: Fn(NaiveDate) -> (i32, u32),
{
    let mut buckets: BTreeMap<(i32, u32), PricePoint> = BTreeMap::new();
    for point in points {
        buckets.insert(key(point.date), *point);
    }
    let mut out: Vec<PricePoint> = buckets.into_values().collect();
    out.sort_by_key(|p| p.date);
    out
}
