//! Core domain types and logic.

pub mod backtest;
pub mod chart_scale;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod price;
pub mod resample;
pub mod signal;
pub mod strategy;
pub mod window;
pub mod workspace;
