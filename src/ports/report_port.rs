//! Report generation port trait.

use crate::domain::error::SignalbenchError;
use crate::domain::strategy::StrategyDefinition;
use crate::domain::window::WindowSelector;
use crate::domain::workspace::Evaluation;

/// Everything a report needs to describe one evaluation.
pub struct ReportContext<'a> {
    pub symbol: &'a str,
    pub strategy: &'a StrategyDefinition,
    pub selector: &'a WindowSelector,
    pub evaluation: &'a Evaluation,
    pub currency: &'a str,
}

pub trait ReportPort {
    /// Render the report. Written to `output_path` when given, otherwise to
    /// stdout.
    fn write(&self, ctx: &ReportContext, output_path: Option<&str>) -> Result<(), SignalbenchError>;
}
