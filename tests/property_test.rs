//! Property tests for core invariants.
//!
//! Uses proptest to verify:
//! 1. Cleaned signals alternate starting with a buy, and cleaning is idempotent
//! 2. Preset windows stay within their day range and MAX daily is the identity
//! 3. Every resample output is densely renumbered
//! 4. The book never holds cash and shares at once and equity stays non-negative
//! 5. Tick counts stay within their bounds

mod common;

use chrono::{Duration, NaiveDate};
use common::*;
use proptest::prelude::*;
use signalbench::domain::backtest::{simulate, Book};
use signalbench::domain::chart_scale::{index_ticks, price_ticks};
use signalbench::domain::price::from_records;
use signalbench::domain::resample::resample;
use signalbench::domain::signal::{clean, is_alternating, Side, Signal};
use signalbench::domain::window::{Frequency, RangePreset, WindowSelector};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_signal(max_index: usize) -> impl Strategy<Value = Signal> {
    (0..max_index, any::<bool>()).prop_map(|(index, buy)| {
        if buy {
            Signal::buy(index)
        } else {
            Signal::sell(index)
        }
    })
}

fn arb_signals(max_index: usize) -> impl Strategy<Value = Vec<Signal>> {
    prop::collection::vec(arb_signal(max_index), 0..40).prop_map(|mut v| {
        v.sort_by_key(|s| s.index);
        v
    })
}

fn arb_close() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Ascending dates with gaps of 1..=4 days, starting in 2020.
fn arb_series() -> impl Strategy<Value = Vec<PricePoint>> {
    prop::collection::vec((1i64..=4, arb_close()), 1..400).prop_map(|steps| {
        let mut day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let records: Vec<(NaiveDate, f64)> = steps
            .into_iter()
            .map(|(gap, close)| {
                day += Duration::days(gap);
                (day, close)
            })
            .collect();
        from_records(records)
    })
}

fn arb_day_preset() -> impl Strategy<Value = RangePreset> {
    prop::sample::select(vec![
        RangePreset::OneDay,
        RangePreset::FiveDays,
        RangePreset::TenDays,
        RangePreset::OneMonth,
        RangePreset::ThreeMonths,
        RangePreset::SixMonths,
        RangePreset::OneYear,
        RangePreset::FiveYears,
        RangePreset::TenYears,
    ])
}

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop::sample::select(vec![Frequency::Daily, Frequency::Weekly, Frequency::Monthly])
}

// ── 1. Alternation ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn cleaned_signals_alternate(raw in arb_signals(200)) {
        let cleaned = clean(&raw);
        prop_assert!(is_alternating(&cleaned));
        if let Some(first) = cleaned.first() {
            prop_assert_eq!(first.side, Side::Buy);
        }
        prop_assert!(cleaned.len() <= raw.len());
    }

    #[test]
    fn cleaning_is_idempotent(raw in arb_signals(200)) {
        let once = clean(&raw);
        prop_assert_eq!(clean(&once), once);
    }
}

// ── 2-3. Resampling ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn preset_window_within_bounds(
        raw in arb_series(),
        preset in arb_day_preset(),
        frequency in arb_frequency(),
    ) {
        let first = raw[0].date;
        let last = raw[raw.len() - 1].date;
        let days = preset.days().unwrap();
        let lower = (last - Duration::days(days)).max(first);

        let visible = resample(&raw, &WindowSelector::preset(preset, frequency));
        prop_assert!(!visible.is_empty());
        for p in &visible {
            prop_assert!(p.date >= lower && p.date <= last);
        }
        prop_assert!(visible.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn max_daily_is_identity(raw in arb_series()) {
        let visible = resample(&raw, &WindowSelector::default());
        prop_assert_eq!(visible, raw);
    }

    #[test]
    fn resample_renumbers_densely(
        raw in arb_series(),
        preset in arb_day_preset(),
        frequency in arb_frequency(),
    ) {
        let visible = resample(&raw, &WindowSelector::preset(preset, frequency));
        for (i, p) in visible.iter().enumerate() {
            prop_assert_eq!(p.index, i);
        }
    }

    #[test]
    fn custom_window_renumbers_densely(
        raw in arb_series(),
        offset in 0i64..200,
        span in -30i64..400,
        frequency in arb_frequency(),
    ) {
        let start = raw[0].date + Duration::days(offset);
        let end = start + Duration::days(span);
        let visible = resample(&raw, &WindowSelector::custom(start, end, frequency));
        if span < 0 {
            prop_assert!(visible.is_empty());
        }
        for (i, p) in visible.iter().enumerate() {
            prop_assert_eq!(p.index, i);
            prop_assert!(p.date >= start && p.date <= end);
        }
    }
}

// ── 4. Single-position book ──────────────────────────────────────────

proptest! {
    #[test]
    fn book_never_holds_both(
        closes in prop::collection::vec(arb_close(), 1..120),
        raw in arb_signals(120),
        cash in 0.0..100_000.0_f64,
    ) {
        let series = daily_series(date(2024, 1, 1), &closes);
        let mut book = Book::new(cash);
        for signal in &raw {
            let Some(point) = series.get(signal.index) else { continue };
            book.apply(*signal, point.close);
            prop_assert!(book.cash() == 0.0 || book.shares() == 0.0);
            prop_assert!(book.cash() >= 0.0 && book.shares() >= 0.0);
            prop_assert!(book.equity(point.close) >= 0.0);
        }
    }

    #[test]
    fn final_equity_non_negative(
        closes in prop::collection::vec(arb_close(), 1..120),
        raw in arb_signals(150),
        cash in 0.0..100_000.0_f64,
    ) {
        let series = daily_series(date(2024, 1, 1), &closes);
        let sim = simulate(&series, &clean(&raw), cash);
        prop_assert!(sim.result.final_equity >= 0.0);
        prop_assert!(sim.result.win_count <= sim.result.trade_count);
        prop_assert_eq!(sim.result.trade_count, sim.trades.len());
        prop_assert!(sim.trades.iter().rev().skip(1).all(|t| t.is_closed()));
    }
}

// ── 5. Tick bounds ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn price_ticks_bounded(
        min in 1.0..1000.0_f64,
        span in 0.01..1000.0_f64,
        steps in 1usize..10,
    ) {
        let max = min + span;
        let ticks = price_ticks(min, max, steps);
        prop_assert!(ticks.len() <= steps + 1);
        for t in &ticks {
            prop_assert!(*t >= min - 1e-9 && *t <= max + 1e-9);
        }
        prop_assert!(ticks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn index_ticks_bounded(n in 0usize..2000, k in 2usize..12) {
        let ticks = index_ticks(n, k);
        prop_assert_eq!(ticks[0], 0);
        prop_assert!(ticks.len() <= 2 * k - 1);
        prop_assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        if n > 0 {
            prop_assert_eq!(*ticks.last().unwrap(), n - 1);
        }
    }
}
