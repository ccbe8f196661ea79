//! Synthetic earnings-cycle momentum.
//!
//! Every `period` bars is treated as an earnings event. A buy is placed
//! `pre_window` bars before the event and a sell `post_window` bars after,
//! but only when price rose into the event.

use super::{length_param, Category, ParamDef, ParamValues, SignalGenerator, StrategyDefinition};
use crate::domain::price::PricePoint;
use crate::domain::signal::Signal;

pub const KEY: &str = "earnings_momentum";

const DEFAULT_PRE_WINDOW: f64 = 5.0;
const DEFAULT_POST_WINDOW: f64 = 5.0;
const DEFAULT_PERIOD: f64 = 40.0;

pub struct EarningsMomentum;

impl SignalGenerator for EarningsMomentum {
    fn compute_signals(&self, series: &[PricePoint], params: &ParamValues) -> Vec<Signal> {
        let pre = length_param(params, "pre_window", DEFAULT_PRE_WINDOW, 0);
        let post = length_param(params, "post_window", DEFAULT_POST_WINDOW, 0);
        let period = length_param(params, "period", DEFAULT_PERIOD, 1);

        let len = series.len();
        let mut signals = Vec::new();
        let mut event = period;

        while event < len {
            let buy_idx = event.saturating_sub(pre);
            let sell_idx = event.saturating_add(post).min(len - 1);
            // Equals `event` while `event < len`. A clamped reference would
            // compare a bar to itself and never fire.
            let reference = event.min(len - 1);
            if series[buy_idx].close < series[reference].close {
                signals.push(Signal::buy(buy_idx));
                signals.push(Signal::sell(sell_idx));
            }
            event = event.saturating_add(period);
        }

        signals
    }
}

pub fn definition() -> StrategyDefinition {
    StrategyDefinition {
        key: KEY.to_string(),
        name: "Earnings Momentum".to_string(),
        category: Category::Fundamental,
        summary: "Buy before earnings if momentum is positive; exit shortly after.".to_string(),
        param_defs: vec![
            ParamDef::new("pre_window", "Days before", 1.0, 20.0, 1.0, DEFAULT_PRE_WINDOW),
            ParamDef::new("post_window", "Days after", 1.0, 20.0, 1.0, DEFAULT_POST_WINDOW),
            ParamDef::new(
                "period",
                "Earnings every (bars)",
                20.0,
                60.0,
                1.0,
                DEFAULT_PERIOD,
            ),
        ],
        description: vec![
            "Simulates periodic earnings events and plays momentum into/after the event."
                .to_string(),
            "Illustrative only: real event dates would come from a fundamentals feed.".to_string(),
        ],
        generator: Box::new(EarningsMomentum),
    }
}
