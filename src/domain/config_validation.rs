//! Configuration validation.
//!
//! Validates every config field a backtest reads before any data is loaded.

use crate::domain::error::SignalbenchError;
use crate::domain::strategy::StrategyRegistry;
use crate::domain::window::Frequency;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(
    config: &dyn ConfigPort,
    registry: &StrategyRegistry,
) -> Result<(), SignalbenchError> {
    validate_symbol(config)?;
    validate_frequency(config)?;
    validate_custom_dates(config)?;
    validate_initial_cash(config)?;
    validate_strategy(config, registry)?;
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    match config.get_string("data", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SignalbenchError::ConfigMissing {
            section: "data".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_frequency(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    let Some(value) = config.get_string("window", "frequency") else {
        return Ok(());
    };
    value
        .parse::<Frequency>()
        .map(|_| ())
        .map_err(|e| SignalbenchError::ConfigInvalid {
            section: "window".to_string(),
            key: "frequency".to_string(),
            reason: e.to_string(),
        })
}

/// Dates only need to parse. `start > end` is allowed and yields an empty
/// window.
fn validate_custom_dates(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    for key in ["start", "end"] {
        if let Some(value) = config.get_string("window", key) {
            parse_date(&value, key)?;
        }
    }
    Ok(())
}

pub fn parse_date(value: &str, key: &str) -> Result<NaiveDate, SignalbenchError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SignalbenchError::ConfigInvalid {
            section: "window".to_string(),
            key: key.to_string(),
            reason: format!("invalid {} format, expected YYYY-MM-DD", key),
        }
    })
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), SignalbenchError> {
    let Some(raw) = config.get_string("backtest", "initial_cash") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(()),
        Ok(_) => Err(SignalbenchError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be non-negative".to_string(),
        }),
        Err(_) => Err(SignalbenchError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_cash".to_string(),
            reason: format!("not a number: {}", raw.trim()),
        }),
    }
}

fn validate_strategy(
    config: &dyn ConfigPort,
    registry: &StrategyRegistry,
) -> Result<(), SignalbenchError> {
    let key = match config.get_string("strategy", "key") {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => {
            return Err(SignalbenchError::ConfigMissing {
                section: "strategy".to_string(),
                key: "key".to_string(),
            })
        }
    };
    let definition = registry.get(&key)?;

    for def in &definition.param_defs {
        if let Some(raw) = config.get_string("strategy", &def.name) {
            if raw.trim().parse::<f64>().is_err() {
                return Err(SignalbenchError::ConfigInvalid {
                    section: "strategy".to_string(),
                    key: def.name.clone(),
                    reason: format!("not a number: {}", raw.trim()),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn validate(content: &str) -> Result<(), SignalbenchError> {
        validate_config(&make_config(content), &StrategyRegistry::builtin())
    }

    #[test]
    fn valid_config_passes() {
        let result = validate(
            r#"
[data]
path = ./data
symbol = SPY

[window]
range = CUSTOM
frequency = weekly
start = 2023-01-01
end = 2023-12-31

[strategy]
key = sma_crossover
fast = 10
slow = 30

[backtest]
initial_cash = 10000
"#,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn minimal_config_passes() {
        assert!(validate("[data]\nsymbol = SPY\n[strategy]\nkey = earnings_momentum\n").is_ok());
    }

    #[test]
    fn missing_symbol_fails() {
        let err = validate("[data]\npath = ./data\n[strategy]\nkey = sma_crossover\n").unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigMissing { key, .. } if key == "symbol"));
    }

    #[test]
    fn blank_symbol_fails() {
        let err = validate("[data]\nsymbol =   \n[strategy]\nkey = sma_crossover\n").unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigMissing { key, .. } if key == "symbol"));
    }

    #[test]
    fn missing_strategy_key_fails() {
        let err = validate("[data]\nsymbol = SPY\n").unwrap_err();
        assert!(matches!(
            err,
            SignalbenchError::ConfigMissing { section, .. } if section == "strategy"
        ));
    }

    #[test]
    fn unknown_strategy_fails() {
        let err = validate("[data]\nsymbol = SPY\n[strategy]\nkey = macd_cross\n").unwrap_err();
        assert!(matches!(err, SignalbenchError::UnknownStrategy { key } if key == "macd_cross"));
    }

    #[test]
    fn non_numeric_param_fails() {
        let err = validate("[data]\nsymbol = SPY\n[strategy]\nkey = sma_crossover\nfast = quick\n")
            .unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "fast"));
    }

    #[test]
    fn out_of_range_param_is_not_an_error() {
        assert!(
            validate("[data]\nsymbol = SPY\n[strategy]\nkey = sma_crossover\nslow = 4000\n")
                .is_ok()
        );
    }

    #[test]
    fn negative_initial_cash_fails() {
        let err = validate(
            "[data]\nsymbol = SPY\n[strategy]\nkey = sma_crossover\n[backtest]\ninitial_cash = -1\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SignalbenchError::ConfigInvalid { key, .. } if key == "initial_cash"
        ));
    }

    #[test]
    fn zero_initial_cash_passes() {
        assert!(validate(
            "[data]\nsymbol = SPY\n[strategy]\nkey = sma_crossover\n[backtest]\ninitial_cash = 0\n",
        )
        .is_ok());
    }

    #[test]
    fn unknown_frequency_fails() {
        let err = validate(
            "[data]\nsymbol = SPY\n[window]\nfrequency = hourly\n[strategy]\nkey = sma_crossover\n",
        )
        .unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "frequency"));
    }

    #[test]
    fn bad_custom_date_fails() {
        let err = validate(
            "[data]\nsymbol = SPY\n[window]\nrange = CUSTOM\nstart = 2023/01/01\n[strategy]\nkey = sma_crossover\n",
        )
        .unwrap_err();
        assert!(matches!(err, SignalbenchError::ConfigInvalid { key, .. } if key == "start"));
    }

    #[test]
    fn reversed_custom_dates_pass() {
        assert!(validate(
            "[data]\nsymbol = SPY\n[window]\nrange = CUSTOM\nstart = 2024-01-01\nend = 2023-01-01\n[strategy]\nkey = sma_crossover\n",
        )
        .is_ok());
    }
}
