//! Simple Moving Average indicator.
//!
//! Running window sum: SMA[i] = sum(C[i-n+1..=i]) / n.
//! Warmup: first (n-1) points are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub fn calculate_sma(points: &[PricePoint], period: usize) -> IndicatorSeries {
    if period == 0 || points.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Sma(period),
            values: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(points.len());
    let mut sum = 0.0;

    for (i, point) in points.iter().enumerate() {
        sum += point.close;
        if i >= period {
            sum -= points[i - period].close;
        }
        let valid = i + 1 >= period;
        values.push(IndicatorPoint {
            date: point.date,
            valid,
            value: if valid { sum / period as f64 } else { 0.0 },
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
