//! Fast/slow simple moving average crossover.
//!
//! Buy where fast − slow goes from ≤ 0 to > 0, sell where it goes from ≥ 0
//! to < 0. Positions where either average is still warming up are skipped
//! and never act as the "previous" side of a transition.

use super::{length_param, Category, ParamDef, ParamValues, SignalGenerator, StrategyDefinition};
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::price::PricePoint;
use crate::domain::signal::Signal;

pub const KEY: &str = "sma_crossover";

const DEFAULT_FAST: f64 = 12.0;
const DEFAULT_SLOW: f64 = 26.0;
const DEFAULT_SIGNAL: f64 = 9.0;

pub struct SmaCrossover;

impl SignalGenerator for SmaCrossover {
    fn compute_signals(&self, series: &[PricePoint], params: &ParamValues) -> Vec<Signal> {
        let fast = length_param(params, "fast", DEFAULT_FAST, 1);
        let slow = length_param(params, "slow", DEFAULT_SLOW, 1);

        let fast_ma = calculate_sma(series, fast);
        let slow_ma = calculate_sma(series, slow);

        let mut signals = Vec::new();
        let mut prev_diff: Option<f64> = None;

        for i in 0..series.len() {
            let (Some(f), Some(s)) = (fast_ma.value_at(i), slow_ma.value_at(i)) else {
                continue;
            };
            let diff = f - s;
            if let Some(prev) = prev_diff {
                if prev <= 0.0 && diff > 0.0 {
                    signals.push(Signal::buy(i));
                }
                if prev >= 0.0 && diff < 0.0 {
                    signals.push(Signal::sell(i));
                }
            }
            prev_diff = Some(diff);
        }

        tracing::debug!(
            fast = %fast_ma.indicator_type,
            slow = %slow_ma.indicator_type,
            signals = signals.len(),
            "sma crossover signals"
        );
        signals
    }
}

pub fn definition() -> StrategyDefinition {
    StrategyDefinition {
        key: KEY.to_string(),
        name: "SMA Crossover".to_string(),
        category: Category::Technical,
        summary: "Buy when a fast MA crosses above a slow MA; sell on cross down.".to_string(),
        param_defs: vec![
            ParamDef::new("fast", "Fast MA", 2.0, 100.0, 1.0, DEFAULT_FAST),
            ParamDef::new("slow", "Slow MA", 5.0, 200.0, 1.0, DEFAULT_SLOW),
            // Shown on the parameter surface; the crossover itself does not read it.
            ParamDef::new("signal", "Signal Len", 2.0, 50.0, 1.0, DEFAULT_SIGNAL),
        ],
        description: vec![
            "Tracks trend changes using a fast vs. slow moving average.".to_string(),
            "Works best in trending markets; may chop in sideways regimes.".to_string(),
        ],
        generator: Box::new(SmaCrossover),
    }
}
