//! Plain-text report adapter implementing ReportPort.
//!
//! Sections: header, parameters, results, signal log, trade log, chart axes.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;

use crate::domain::chart_scale::{format_date_label, format_price_label};
use crate::domain::error::SignalbenchError;
use crate::domain::window::RangePreset;
use crate::ports::report_port::{ReportContext, ReportPort};

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, ctx: &ReportContext) -> String {
        let mut out = String::new();
        render_header(&mut out, ctx);
        render_results(&mut out, ctx);
        render_signals(&mut out, ctx);
        render_trades(&mut out, ctx);
        render_axes(&mut out, ctx);
        out
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "-".repeat(title.len()));
}

fn render_header(out: &mut String, ctx: &ReportContext) {
    let eval = ctx.evaluation;
    let title = format!("{} on {}", ctx.strategy.name, ctx.symbol);
    let _ = writeln!(out, "{}\n{}", title, "=".repeat(title.len()));
    let _ = writeln!(
        out,
        "Strategy:     {} ({})",
        ctx.strategy.key, ctx.strategy.category
    );

    let window = match ctx.selector.range {
        RangePreset::Custom => format!(
            "{} .. {}",
            ctx.selector
                .custom_start
                .map(|d| d.to_string())
                .unwrap_or_else(|| "?".to_string()),
            ctx.selector
                .custom_end
                .map(|d| d.to_string())
                .unwrap_or_else(|| "?".to_string()),
        ),
        preset => preset.label().to_string(),
    };
    let _ = writeln!(out, "Window:       {}, {}", window, ctx.selector.frequency);

    match (eval.visible.first(), eval.visible.last()) {
        (Some(first), Some(last)) => {
            let _ = writeln!(
                out,
                "Bars:         {} ({} to {})",
                eval.visible.len(),
                first.date,
                last.date
            );
        }
        _ => {
            let _ = writeln!(out, "Bars:         0");
        }
    }

    let params: Vec<String> = eval
        .params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    let _ = writeln!(out, "Parameters:   {}", params.join(", "));
}

fn render_results(out: &mut String, ctx: &ReportContext) {
    let eval = ctx.evaluation;
    section(out, "Results");
    let _ = writeln!(out, "Initial cash: {:.2}", eval.initial_cash);
    let _ = writeln!(out, "Final equity: {:.2}", eval.result.final_equity);
    match eval.return_pct() {
        Some(r) => {
            let _ = writeln!(out, "Return:       {:+.2}%", r * 100.0);
        }
        None => {
            let _ = writeln!(out, "Return:       n/a");
        }
    }
    let _ = writeln!(out, "Trades:       {}", eval.result.trade_count);
    match eval.result.win_rate() {
        Some(w) => {
            let _ = writeln!(
                out,
                "Win rate:     {:.1}% ({} of {})",
                w * 100.0,
                eval.result.win_count,
                eval.result.trade_count
            );
        }
        None => {
            let _ = writeln!(out, "Win rate:     n/a");
        }
    }
}

fn render_signals(out: &mut String, ctx: &ReportContext) {
    let eval = ctx.evaluation;
    section(out, "Signals");
    if eval.signals.is_empty() {
        let _ = writeln!(out, "No signals.");
        return;
    }
    let dropped = eval.raw_signals.len() - eval.signals.len();
    if dropped > 0 {
        let _ = writeln!(out, "({} raw signals dropped by alternation)", dropped);
    }
    for signal in &eval.signals {
        if let Some(point) = eval.visible.get(signal.index) {
            let _ = writeln!(
                out,
                "{:<4}  {}  #{:<5} {:>12.2}",
                signal.side.to_string(),
                point.date,
                signal.index,
                point.close
            );
        }
    }
}

fn render_trades(out: &mut String, ctx: &ReportContext) {
    let eval = ctx.evaluation;
    section(out, "Trades");
    if eval.trades.is_empty() {
        let _ = writeln!(out, "No trades.");
        return;
    }
    let date_of = |index: usize| {
        eval.visible
            .get(index)
            .map(|p| p.date.to_string())
            .unwrap_or_default()
    };
    for (n, trade) in eval.trades.iter().enumerate() {
        let entry = format!("{} @ {:.2}", date_of(trade.entry_index), trade.entry_price);
        let line = match (trade.exit_index, trade.exit_price, trade.return_pct()) {
            (Some(idx), Some(price), Some(ret)) => format!(
                "{:>3}. {}  ->  {} @ {:.2}  {:+.2}%",
                n + 1,
                entry,
                date_of(idx),
                price,
                ret * 100.0
            ),
            _ => format!("{:>3}. {}  ->  open", n + 1, entry),
        };
        let _ = writeln!(out, "{}", line);
    }
}

fn render_axes(out: &mut String, ctx: &ReportContext) {
    let Some(scale) = &ctx.evaluation.scale else {
        return;
    };
    section(out, "Chart axes");
    let prices: Vec<String> = scale
        .price_ticks
        .iter()
        .map(|&v| format_price_label(v, ctx.currency))
        .collect();
    let dates: Vec<String> = scale
        .date_ticks
        .iter()
        .map(|t| format_date_label(t.date))
        .collect();
    let _ = writeln!(
        out,
        "Close range:  {} .. {}",
        format_price_label(scale.min_close, ctx.currency),
        format_price_label(scale.max_close, ctx.currency)
    );
    let _ = writeln!(out, "Price ticks:  {}", prices.join(" | "));
    let _ = writeln!(out, "Date ticks:   {}", dates.join(" | "));
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        ctx: &ReportContext,
        output_path: Option<&str>,
    ) -> Result<(), SignalbenchError> {
        let content = self.render(ctx);
        match output_path {
            Some(path) => fs::write(path, content)?,
            None => std::io::stdout().lock().write_all(content.as_bytes())?,
        }
        Ok(())
    }
}
