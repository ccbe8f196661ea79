//! One-shot evaluation of a strategy over a windowed series.
//!
//! Everything is recomputed from the raw series on each call; nothing is
//! cached between evaluations.

use crate::domain::backtest::{simulate, BacktestResult, Trade};
use crate::domain::chart_scale::ChartScale;
use crate::domain::price::PricePoint;
use crate::domain::resample::resample;
use crate::domain::signal::{clean, Signal};
use crate::domain::strategy::{resolve_params, ParamValues, StrategyDefinition};
use crate::domain::window::WindowSelector;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Evaluation {
    pub visible: Vec<PricePoint>,
    /// Parameters after default filling and clamping.
    pub params: ParamValues,
    pub raw_signals: Vec<Signal>,
    pub signals: Vec<Signal>,
    pub result: BacktestResult,
    pub trades: Vec<Trade>,
    pub initial_cash: f64,
    /// `None` when the visible series is empty.
    pub scale: Option<ChartScale>,
}

impl Evaluation {
    pub fn return_pct(&self) -> Option<f64> {
        self.result.return_pct(self.initial_cash)
    }
}

pub fn evaluate(
    raw: &[PricePoint],
    selector: &WindowSelector,
    strategy: &StrategyDefinition,
    params: &ParamValues,
    initial_cash: f64,
) -> Evaluation {
    let visible = resample(raw, selector);
    let params = resolve_params(params, &strategy.param_defs);
    let raw_signals = strategy.compute_signals(&visible, &params);
    let signals = clean(&raw_signals);
    let simulation = simulate(&visible, &signals, initial_cash);
    let scale = ChartScale::derive(&visible);

    tracing::debug!(
        strategy = %strategy.key,
        bars = visible.len(),
        raw = raw_signals.len(),
        cleaned = signals.len(),
        trades = simulation.result.trade_count,
        "evaluation complete"
    );

    Evaluation {
        visible,
        params,
        raw_signals,
        signals,
        result: simulation.result,
        trades: simulation.trades,
        initial_cash,
        scale,
    }
}
