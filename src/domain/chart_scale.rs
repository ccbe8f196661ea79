//! Axis tick derivation for a price chart of the visible series.
//!
//! Only numeric tick positions are produced here; pixel mapping belongs to
//! the renderer.

use crate::domain::price::{close_range, PricePoint};
use chrono::NaiveDate;

pub const PRICE_STEPS: usize = 4;
pub const DATE_TICKS: usize = 6;

const NICE_MULTIPLIERS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];
const TICK_EPSILON: f64 = 1e-9;

/// Price ticks at a "nice" step between `min` and `max`.
///
/// Step is the first of {1, 2, 2.5, 5, 10} × 10^⌊log10(raw)⌋ that covers
/// `raw = (max − min) / step_count`. A degenerate range yields `[min]`.
pub fn price_ticks(min: f64, max: f64, step_count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return vec![min];
    }

    let raw_step = (max - min) / step_count.max(1) as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let multiplier = NICE_MULTIPLIERS
        .iter()
        .copied()
        .find(|m| raw_step / (m * magnitude) <= 1.0)
        .unwrap_or(10.0);
    let step = multiplier * magnitude;
    if !step.is_finite() || step <= 0.0 {
        return vec![min];
    }

    let first = (min / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut k = 0usize;
    while k <= step_count.max(1) {
        let value = first + k as f64 * step;
        if value > max + TICK_EPSILON {
            break;
        }
        ticks.push(value);
        k += 1;
    }
    ticks
}

/// Every `⌊(n−1)/(k−1)⌋`-th index from 0 (stride at least 1), plus the final
/// index `n−1` when the stride does not land on it. `n ≤ 1` yields `[0]`.
pub fn index_ticks(n: usize, k: usize) -> Vec<usize> {
    if n <= 1 {
        return vec![0];
    }
    let stride = ((n - 1) / (k.max(2) - 1)).max(1);
    let mut ticks: Vec<usize> = (0..n).step_by(stride).collect();
    if ticks.last() != Some(&(n - 1)) {
        ticks.push(n - 1);
    }
    ticks
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DateTick {
    pub index: usize,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChartScale {
    pub min_close: f64,
    pub max_close: f64,
    pub price_ticks: Vec<f64>,
    pub date_ticks: Vec<DateTick>,
}

impl ChartScale {
    /// Scale for `series`, `None` when there is nothing to draw.
    pub fn derive(series: &[PricePoint]) -> Option<Self> {
        let (min_close, max_close) = close_range(series)?;
        let date_ticks = index_ticks(series.len(), DATE_TICKS)
            .into_iter()
            .map(|index| DateTick {
                index,
                date: series[index].date,
            })
            .collect();
        Some(Self {
            min_close,
            max_close,
            price_ticks: price_ticks(min_close, max_close, PRICE_STEPS),
            date_ticks,
        })
    }
}

/// Whole-unit price label with the currency code, e.g. `"USD 1,250"`.
pub fn format_price_label(value: f64, currency: &str) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{} {}{}", currency, sign, grouped)
}

/// Short month/day label, e.g. `"Jan 5"`.
pub fn format_date_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::from_records;
    use approx::assert_relative_eq;
    use chrono::Duration;

    #[test]
    fn price_ticks_nice_step() {
        // raw = 5 → step 5
        assert_eq!(
            price_ticks(100.0, 120.0, 4),
            vec![100.0, 105.0, 110.0, 115.0, 120.0]
        );
    }

    #[test]
    fn price_ticks_two_and_a_half_multiplier() {
        // raw = 2.25 → magnitude 1, 2 is too small, 2.5 fits
        let ticks = price_ticks(91.0, 100.0, 4);
        assert_eq!(ticks, vec![92.5, 95.0, 97.5, 100.0]);
    }

    #[test]
    fn price_ticks_fractional_range() {
        let ticks = price_ticks(0.12, 0.47, 4);
        // raw = 0.0875 → magnitude 0.01, multiplier 10 → step 0.1
        assert_eq!(ticks.len(), 3);
        assert_relative_eq!(ticks[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(ticks[2], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn price_ticks_extreme_range() {
        assert_eq!(price_ticks(1e-300, 1.7e308, 1), vec![1e-300]);
        assert_eq!(price_ticks(-1.7e308, 1.7e308, 4), vec![-1.7e308]);
    }

    #[test]
    fn price_ticks_degenerate() {
        assert_eq!(price_ticks(50.0, 50.0, 4), vec![50.0]);
        assert_eq!(price_ticks(60.0, 50.0, 4), vec![60.0]);
        assert_eq!(price_ticks(f64::NAN, 50.0, 4).len(), 1);
    }

    #[test]
    fn price_ticks_zero_steps_treated_as_one() {
        assert_eq!(price_ticks(0.0, 10.0, 0), vec![0.0, 10.0]);
    }

    #[test]
    fn index_ticks_includes_final() {
        assert_eq!(index_ticks(12, 6), vec![0, 2, 4, 6, 8, 10, 11]);
        assert_eq!(index_ticks(11, 6), vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn index_ticks_short_series() {
        assert_eq!(index_ticks(0, 6), vec![0]);
        assert_eq!(index_ticks(1, 6), vec![0]);
        assert_eq!(index_ticks(3, 6), vec![0, 1, 2]);
    }

    #[test]
    fn index_ticks_single_target() {
        assert_eq!(index_ticks(5, 1), vec![0, 4]);
    }

    #[test]
    fn derive_scale_pairs_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series =
            from_records((0..11).map(|i| (start + Duration::days(i), 100.0 + 2.0 * i as f64)));
        let scale = ChartScale::derive(&series).unwrap();
        assert_eq!(scale.min_close, 100.0);
        assert_eq!(scale.max_close, 120.0);
        assert_eq!(scale.price_ticks.first(), Some(&100.0));
        assert_eq!(scale.date_ticks.len(), 6);
        assert_eq!(scale.date_ticks[5].index, 10);
        assert_eq!(
            scale.date_ticks[5].date,
            NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()
        );
    }

    #[test]
    fn derive_empty_series() {
        assert!(ChartScale::derive(&[]).is_none());
    }

    #[test]
    fn labels() {
        assert_eq!(format_price_label(1249.6, "USD"), "USD 1,250");
        assert_eq!(format_price_label(95.0, "EUR"), "EUR 95");
        assert_eq!(format_price_label(-1500.0, "USD"), "USD -1,500");
        assert_eq!(
            format_date_label(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            "Jan 5"
        );
    }
}
