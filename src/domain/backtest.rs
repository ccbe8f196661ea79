//! Single-position backtest simulator.
//!
//! Long-only, all-in/all-out: a buy while flat converts all cash to shares at
//! the signal bar's close, a sell while long converts all shares back. Buys
//! while long and sells while flat are ignored, so a misbehaving strategy
//! cannot break the replay. No fees, no slippage, no partial sizing.

use crate::domain::price::PricePoint;
use crate::domain::signal::{Side, Signal};

pub const DEFAULT_INITIAL_CASH: f64 = 10_000.0;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub initial_cash: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_cash: DEFAULT_INITIAL_CASH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BacktestResult {
    pub final_equity: f64,
    pub trade_count: usize,
    pub win_count: usize,
}

impl BacktestResult {
    /// Wins / trades, `None` when nothing was traded.
    pub fn win_rate(&self) -> Option<f64> {
        if self.trade_count == 0 {
            None
        } else {
            Some(self.win_count as f64 / self.trade_count as f64)
        }
    }

    /// final / initial − 1, `None` when the initial cash is zero.
    pub fn return_pct(&self, initial_cash: f64) -> Option<f64> {
        if initial_cash > 0.0 {
            Some(self.final_equity / initial_cash - 1.0)
        } else {
            None
        }
    }
}

/// One round trip. `exit_*` is `None` while the position is still open at
/// the end of the series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trade {
    pub entry_index: usize,
    pub entry_price: f64,
    pub exit_index: Option<usize>,
    pub exit_price: Option<f64>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_index.is_some()
    }

    pub fn is_win(&self) -> bool {
        self.exit_price.is_some_and(|exit| exit > self.entry_price)
    }

    pub fn return_pct(&self) -> Option<f64> {
        self.exit_price.map(|exit| exit / self.entry_price - 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Holding {
    Flat { cash: f64 },
    Long { shares: f64, entry_price: f64 },
}

/// Running state of the replay. Holds either cash or shares, never both.
#[derive(Debug, Clone)]
pub struct Book {
    holding: Holding,
    trade_count: usize,
    win_count: usize,
    trades: Vec<Trade>,
}

impl Book {
    /// Negative or non-finite starting cash is treated as zero.
    pub fn new(initial_cash: f64) -> Self {
        let cash = if initial_cash.is_finite() {
            initial_cash.max(0.0)
        } else {
            0.0
        };
        Self {
            holding: Holding::Flat { cash },
            trade_count: 0,
            win_count: 0,
            trades: Vec::new(),
        }
    }

    pub fn holding(&self) -> Holding {
        self.holding
    }

    pub fn cash(&self) -> f64 {
        match self.holding {
            Holding::Flat { cash } => cash,
            Holding::Long { .. } => 0.0,
        }
    }

    pub fn shares(&self) -> f64 {
        match self.holding {
            Holding::Flat { .. } => 0.0,
            Holding::Long { shares, .. } => shares,
        }
    }

    pub fn equity(&self, price: f64) -> f64 {
        self.cash() + self.shares() * price
    }

    /// Apply `signal` at `price`. Returns whether the book changed.
    pub fn apply(&mut self, signal: Signal, price: f64) -> bool {
        match (signal.side, self.holding) {
            (Side::Buy, Holding::Flat { cash }) => {
                if price.is_nan() || price <= 0.0 {
                    tracing::debug!(
                        index = signal.index,
                        price,
                        "buy at non-positive price ignored"
                    );
                    return false;
                }
                self.holding = Holding::Long {
                    shares: cash / price,
                    entry_price: price,
                };
                self.trade_count += 1;
                self.trades.push(Trade {
                    entry_index: signal.index,
                    entry_price: price,
                    exit_index: None,
                    exit_price: None,
                });
                true
            }
            (
                Side::Sell,
                Holding::Long {
                    shares,
                    entry_price,
                },
            ) => {
                self.holding = Holding::Flat {
                    cash: shares * price,
                };
                if price > entry_price {
                    self.win_count += 1;
                }
                if let Some(open) = self.trades.last_mut() {
                    open.exit_index = Some(signal.index);
                    open.exit_price = Some(price);
                }
                true
            }
            _ => false,
        }
    }

    fn finish(self, last_close: f64) -> Simulation {
        Simulation {
            result: BacktestResult {
                final_equity: self.equity(last_close),
                trade_count: self.trade_count,
                win_count: self.win_count,
            },
            trades: self.trades,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub result: BacktestResult,
    pub trades: Vec<Trade>,
}

/// Replay `signals` over `series` and record each round trip.
///
/// Signals referencing an index outside `series` are ignored. An empty
/// series returns the starting cash untouched.
pub fn simulate(series: &[PricePoint], signals: &[Signal], initial_cash: f64) -> Simulation {
    let mut book = Book::new(initial_cash);

    let Some(last) = series.last() else {
        return book.finish(0.0);
    };

    for signal in signals {
        let Some(point) = series.get(signal.index) else {
            tracing::debug!(
                index = signal.index,
                len = series.len(),
                "signal outside series ignored"
            );
            continue;
        };
        if !book.apply(*signal, point.close) {
            tracing::debug!(%signal, "signal ignored in current state");
        }
    }

    book.finish(last.close)
}

pub fn run(series: &[PricePoint], signals: &[Signal], initial_cash: f64) -> BacktestResult {
    simulate(series, signals, initial_cash).result
}
