//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{BacktestConfig, DEFAULT_INITIAL_CASH};
use crate::domain::config_validation::{parse_date, validate_config};
use crate::domain::error::SignalbenchError;
use crate::domain::strategy::{Category, ParamValues, StrategyDefinition, StrategyRegistry};
use crate::domain::window::{Frequency, RangePreset, WindowSelector};
use crate::domain::workspace::{evaluate, Evaluation};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{ReportContext, ReportPort};

const DEFAULT_DATA_PATH: &str = ".";
const DEFAULT_CURRENCY: &str = "USD";

#[derive(Parser, Debug)]
#[command(
    name = "signalbench",
    about = "Backtest trading strategies over daily price series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a strategy over a symbol and write a report
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(short, long)]
        range: Option<String>,
        #[arg(short, long)]
        frequency: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List registered strategies
    Strategies {
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Show a strategy's parameters and description
    Describe { strategy: String },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available under the configured data path
    Symbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            strategy,
            range,
            frequency,
            output,
        } => {
            let overrides = CliOverrides {
                symbol,
                strategy,
                range,
                frequency,
                output: output.map(|p| p.display().to_string()),
            };
            run_backtest(&config, &overrides)
        }
        Command::Strategies { category, query } => run_strategies(category.as_deref(), &query),
        Command::Describe { strategy } => run_describe(&strategy),
        Command::Validate { config } => run_validate(&config),
        Command::Symbols { config } => run_symbols(&config),
    }
}

fn fail(err: &SignalbenchError) -> ExitCode {
    tracing::error!("{err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        fail(&SignalbenchError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })
}

/// Values given on the command line; each one replaces the file's value.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub symbol: Option<String>,
    pub strategy: Option<String>,
    pub range: Option<String>,
    pub frequency: Option<String>,
    pub output: Option<String>,
}

/// A config layered over another. Keys set here shadow the base.
pub struct LayeredConfig<'a> {
    base: &'a dyn ConfigPort,
    values: BTreeMap<(String, String), String>,
}

impl<'a> LayeredConfig<'a> {
    pub fn new(base: &'a dyn ConfigPort) -> Self {
        Self {
            base,
            values: BTreeMap::new(),
        }
    }

    pub fn with_overrides(base: &'a dyn ConfigPort, overrides: &CliOverrides) -> Self {
        let mut layered = Self::new(base);
        layered.set("data", "symbol", overrides.symbol.as_deref());
        layered.set("strategy", "key", overrides.strategy.as_deref());
        layered.set("window", "range", overrides.range.as_deref());
        layered.set("window", "frequency", overrides.frequency.as_deref());
        layered.set("report", "output", overrides.output.as_deref());
        layered
    }

    pub fn set(&mut self, section: &str, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.values.insert(
                (section.to_lowercase(), key.to_lowercase()),
                value.to_string(),
            );
        }
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&String> {
        self.values
            .get(&(section.to_lowercase(), key.to_lowercase()))
    }
}

impl ConfigPort for LayeredConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.lookup(section, key)
            .cloned()
            .or_else(|| self.base.get_string(section, key))
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.lookup(section, key) {
            Some(v) => v.trim().parse().unwrap_or(default),
            None => self.base.get_double(section, key, default),
        }
    }

    fn section_keys(&self, section: &str) -> Vec<String> {
        let wanted = section.to_lowercase();
        let mut keys = self.base.section_keys(section);
        keys.extend(
            self.values
                .keys()
                .filter(|(s, _)| *s == wanted)
                .map(|(_, k)| k.clone()),
        );
        keys.sort();
        keys.dedup();
        keys
    }
}

/// Everything a backtest run needs, resolved from config.
#[derive(Debug, Clone)]
pub struct BacktestPlan {
    pub symbol: String,
    pub strategy_key: String,
    pub selector: WindowSelector,
    pub params: ParamValues,
    pub backtest: BacktestConfig,
    pub currency: String,
    pub output: Option<String>,
}

/// Symbols are matched against file names in upper case.
pub fn resolve_symbol(config: &dyn ConfigPort) -> Result<String, SignalbenchError> {
    config
        .get_string("data", "symbol")
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SignalbenchError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        })
}

pub fn resolve_strategy<'r>(
    config: &dyn ConfigPort,
    registry: &'r StrategyRegistry,
) -> Result<&'r StrategyDefinition, SignalbenchError> {
    let key = config
        .get_string("strategy", "key")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SignalbenchError::ConfigMissing {
            section: "strategy".into(),
            key: "key".into(),
        })?;
    registry.get(&key)
}

/// An unrecognized range falls back to `MAX`. A `CUSTOM` range with a
/// missing bound is kept as is and produces an empty window.
pub fn build_window_selector(config: &dyn ConfigPort) -> Result<WindowSelector, SignalbenchError> {
    let range = match config.get_string("window", "range") {
        None => RangePreset::Max,
        Some(label) => label.parse::<RangePreset>().unwrap_or_else(|e| {
            tracing::warn!("{e}, using MAX");
            RangePreset::Max
        }),
    };

    let frequency = match config.get_string("window", "frequency") {
        None => Frequency::default(),
        Some(label) => {
            label
                .parse::<Frequency>()
                .map_err(|e| SignalbenchError::ConfigInvalid {
                    section: "window".into(),
                    key: "frequency".into(),
                    reason: e.to_string(),
                })?
        }
    };

    if range != RangePreset::Custom {
        return Ok(WindowSelector::preset(range, frequency));
    }

    let start = config
        .get_string("window", "start")
        .map(|s| parse_date(&s, "start"))
        .transpose()?;
    let end = config
        .get_string("window", "end")
        .map(|s| parse_date(&s, "end"))
        .transpose()?;
    if start.is_none() || end.is_none() {
        tracing::warn!("CUSTOM window without both start and end, nothing will be visible");
    }

    Ok(WindowSelector {
        range,
        frequency,
        custom_start: start,
        custom_end: end,
    })
}

/// Numeric values for the strategy's declared parameters. Undeclared keys
/// in `[strategy]` are ignored with a warning.
pub fn build_params(
    config: &dyn ConfigPort,
    strategy: &StrategyDefinition,
) -> Result<ParamValues, SignalbenchError> {
    let mut params = ParamValues::new();
    for key in config.section_keys("strategy") {
        if key == "key" {
            continue;
        }
        let Some(def) = strategy.param_def(&key) else {
            tracing::warn!(strategy = %strategy.key, param = %key, "ignoring undeclared parameter");
            continue;
        };
        let Some(raw) = config.get_string("strategy", &key) else {
            continue;
        };
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| SignalbenchError::ConfigInvalid {
                section: "strategy".into(),
                key: key.clone(),
                reason: format!("not a number: {}", raw.trim()),
            })?;
        params.insert(def.name.clone(), value);
    }
    Ok(params)
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        initial_cash: config.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH),
    }
}

pub fn build_plan(
    config: &dyn ConfigPort,
    registry: &StrategyRegistry,
) -> Result<BacktestPlan, SignalbenchError> {
    let strategy = resolve_strategy(config, registry)?;
    Ok(BacktestPlan {
        symbol: resolve_symbol(config)?,
        strategy_key: strategy.key.clone(),
        selector: build_window_selector(config)?,
        params: build_params(config, strategy)?,
        backtest: build_backtest_config(config),
        currency: config
            .get_string("report", "currency")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        output: config
            .get_string("report", "output")
            .filter(|s| !s.trim().is_empty()),
    })
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    registry: &StrategyRegistry,
    plan: &BacktestPlan,
) -> Result<Evaluation, SignalbenchError> {
    let strategy = registry.get(&plan.strategy_key)?;

    let raw = data_port.fetch_prices(&plan.symbol)?;
    tracing::info!(symbol = %plan.symbol, bars = raw.len(), "loaded price history");

    let evaluation = evaluate(
        &raw,
        &plan.selector,
        strategy,
        &plan.params,
        plan.backtest.initial_cash,
    );

    tracing::info!(
        strategy = %strategy.key,
        range = %plan.selector.range,
        frequency = %plan.selector.frequency,
        visible = evaluation.visible.len(),
        signals = evaluation.signals.len(),
        trades = evaluation.result.trade_count,
        final_equity = evaluation.result.final_equity,
        "backtest complete"
    );

    let ctx = ReportContext {
        symbol: &plan.symbol,
        strategy,
        selector: &plan.selector,
        evaluation: &evaluation,
        currency: &plan.currency,
    };
    report_port.write(&ctx, plan.output.as_deref())?;
    if let Some(path) = &plan.output {
        tracing::info!("report written to {path}");
    }

    Ok(evaluation)
}

fn run_backtest(config_path: &Path, overrides: &CliOverrides) -> ExitCode {
    tracing::info!("loading config from {}", config_path.display());
    let file = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config = LayeredConfig::with_overrides(&file, overrides);
    let registry = StrategyRegistry::builtin();

    if let Err(e) = validate_config(&config, &registry) {
        return fail(&e);
    }
    let plan = match build_plan(&config, &registry) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let data_path = config
        .get_string("data", "path")
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let data_port = CsvAdapter::new(PathBuf::from(data_path));
    let report_port = TextReportAdapter::new();

    match run_backtest_pipeline(&data_port, &report_port, &registry, &plan) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

/// `all` (any case) or no flag at all means no category filter.
pub fn parse_category_filter(label: Option<&str>) -> Result<Option<Category>, SignalbenchError> {
    let Some(label) = label.map(str::trim) else {
        return Ok(None);
    };
    if label.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    label
        .parse::<Category>()
        .map(Some)
        .map_err(|e| SignalbenchError::ConfigInvalid {
            section: "strategies".into(),
            key: "category".into(),
            reason: e.to_string(),
        })
}

fn run_strategies(category: Option<&str>, query: &str) -> ExitCode {
    let category = match parse_category_filter(category) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let registry = StrategyRegistry::builtin();
    let matches = registry.filter(category, query);
    if matches.is_empty() {
        tracing::info!("no strategies match");
        return ExitCode::SUCCESS;
    }
    for def in matches {
        println!(
            "{:<20} {:<20} {:<12} {}",
            def.key,
            def.name,
            def.category.to_string(),
            def.summary
        );
    }
    ExitCode::SUCCESS
}

fn run_describe(key: &str) -> ExitCode {
    let registry = StrategyRegistry::builtin();
    let def = match registry.get(key) {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };

    println!("{} ({}, {})", def.name, def.key, def.category);
    println!("{}", def.summary);
    println!("\nParameters:");
    for p in &def.param_defs {
        println!(
            "  {:<12} {:<22} min {:<6} max {:<6} step {:<4} default {}",
            p.name, p.label, p.min, p.max, p.step, p.default
        );
    }
    if !def.description.is_empty() {
        println!();
        for block in &def.description {
            println!("{block}");
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    tracing::info!("validating {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let registry = StrategyRegistry::builtin();

    if let Err(e) = validate_config(&config, &registry) {
        return fail(&e);
    }
    let plan = match build_plan(&config, &registry) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let params: Vec<String> = plan
        .params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    println!("symbol:       {}", plan.symbol);
    println!("strategy:     {}", plan.strategy_key);
    println!(
        "window:       {}, {}",
        plan.selector.range, plan.selector.frequency
    );
    println!("parameters:   {}", params.join(", "));
    println!("initial cash: {:.2}", plan.backtest.initial_cash);
    println!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_path = config
        .get_string("data", "path")
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let adapter = CsvAdapter::new(PathBuf::from(&data_path));

    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    if symbols.is_empty() {
        tracing::info!("no symbols found under {data_path}");
    }
    for symbol in &symbols {
        println!("{symbol}");
    }
    ExitCode::SUCCESS
}
