//! Trade signals and the alternation cleaner.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A buy or sell at a position of the series it was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Signal {
    pub index: usize,
    pub side: Side,
}

impl Signal {
    pub fn buy(index: usize) -> Self {
        Self {
            index,
            side: Side::Buy,
        }
    }

    pub fn sell(index: usize) -> Self {
        Self {
            index,
            side: Side::Sell,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.side, self.index)
    }
}

/// Reduce raw detections to a tradable sequence.
///
/// A sell before any kept buy is dropped, and so is any signal repeating the
/// side of the last kept one. The output is empty or starts with a buy and
/// alternates from there.
pub fn clean(raw: &[Signal]) -> Vec<Signal> {
    let mut cleaned: Vec<Signal> = Vec::with_capacity(raw.len());
    for signal in raw {
        match cleaned.last() {
            None if signal.side == Side::Sell => continue,
            Some(last) if last.side == signal.side => continue,
            _ => cleaned.push(*signal),
        }
    }
    cleaned
}

/// True when `signals` is empty or starts with a buy and alternates.
pub fn is_alternating(signals: &[Signal]) -> bool {
    match signals.first() {
        None => true,
        Some(first) if first.side != Side::Buy => false,
        Some(_) => signals.windows(2).all(|w| w[0].side != w[1].side),
    }
}
