//! signalbench: strategy signals and single-position backtests over daily
//! price series.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command-line surface in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
