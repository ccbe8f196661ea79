//! Strategy definitions and the signal-generating capability.
//!
//! A strategy is metadata (key, name, category, parameter surface,
//! description) plus a [`SignalGenerator`]. Generators return raw signals;
//! callers run them through [`crate::domain::signal::clean`] before trading.

pub mod earnings_momentum;
pub mod params;
pub mod registry;
pub mod sma_crossover;

pub use params::{fill_defaults, resolve_params, ParamDef, ParamValues};
pub use registry::StrategyRegistry;

use crate::domain::error::UnknownLabel;
use crate::domain::price::PricePoint;
use crate::domain::signal::Signal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Technical,
    Fundamental,
    MachineLearning,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Technical => write!(f, "technical"),
            Category::Fundamental => write!(f, "fundamental"),
            Category::MachineLearning => write!(f, "ml"),
        }
    }
}

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(Category::Technical),
            "fundamental" => Ok(Category::Fundamental),
            "ml" | "machine learning" | "machine_learning" => Ok(Category::MachineLearning),
            _ => Err(UnknownLabel {
                kind: "category",
                value: s.to_string(),
            }),
        }
    }
}

/// Pure signal computation over a series.
///
/// Implementations must not depend on anything but `series` and `params`,
/// and must return signals in ascending index order of detection.
pub trait SignalGenerator: Send + Sync {
    fn compute_signals(&self, series: &[PricePoint], params: &ParamValues) -> Vec<Signal>;
}

pub struct StrategyDefinition {
    pub key: String,
    pub name: String,
    pub category: Category,
    pub summary: String,
    pub param_defs: Vec<ParamDef>,
    pub description: Vec<String>,
    pub generator: Box<dyn SignalGenerator>,
}

impl StrategyDefinition {
    pub fn compute_signals(&self, series: &[PricePoint], params: &ParamValues) -> Vec<Signal> {
        self.generator.compute_signals(series, params)
    }

    /// Every declared parameter at its default value.
    pub fn default_params(&self) -> ParamValues {
        fill_defaults(&ParamValues::new(), &self.param_defs)
    }

    pub fn param_def(&self, name: &str) -> Option<&ParamDef> {
        self.param_defs.iter().find(|d| d.name == name)
    }
}

impl fmt::Debug for StrategyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyDefinition")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("param_defs", &self.param_defs)
            .finish_non_exhaustive()
    }
}

/// Read a parameter, falling back to `default` when absent or non-finite.
pub(crate) fn param_or(params: &ParamValues, name: &str, default: f64) -> f64 {
    params
        .get(name)
        .copied()
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Window-length style parameter: truncated, never below `floor`.
pub(crate) fn length_param(params: &ParamValues, name: &str, default: f64, floor: usize) -> usize {
    let value = param_or(params, name, default);
    if value < floor as f64 {
        floor
    } else {
        value as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_and_display() {
        assert_eq!("Technical".parse::<Category>(), Ok(Category::Technical));
        assert_eq!("ml".parse::<Category>(), Ok(Category::MachineLearning));
        assert_eq!(Category::Fundamental.to_string(), "fundamental");
        assert!("macro".parse::<Category>().is_err());
    }

    #[test]
    fn param_or_falls_back() {
        let mut params = ParamValues::new();
        params.insert("fast".into(), 7.0);
        params.insert("slow".into(), f64::NAN);
        assert_eq!(param_or(&params, "fast", 12.0), 7.0);
        assert_eq!(param_or(&params, "slow", 26.0), 26.0);
        assert_eq!(param_or(&params, "missing", 3.0), 3.0);
    }

    #[test]
    fn length_param_floors_and_truncates() {
        let mut params = ParamValues::new();
        params.insert("a".into(), 0.0);
        params.insert("b".into(), -4.0);
        params.insert("c".into(), 9.8);
        assert_eq!(length_param(&params, "a", 12.0, 1), 1);
        assert_eq!(length_param(&params, "b", 12.0, 1), 1);
        assert_eq!(length_param(&params, "c", 12.0, 1), 9);
        assert_eq!(length_param(&params, "d", 12.0, 1), 12);
        assert_eq!(length_param(&params, "b", 5.0, 0), 0);
    }
}
