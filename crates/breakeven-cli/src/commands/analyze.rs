use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;

use breakeven_core::analysis::{self, AnalysisInput};
use breakeven_core::handlers::{parse_decimal, parse_fields, FormOptions};
use breakeven_core::levels::ProductionLevels;
use breakeven_core::presentation::ReportSheet;
use breakeven_core::scenarios::ScenarioOverride;
use breakeven_core::{BreakevenInput, InvalidMarginPolicy};

use super::{resolve_fields, FieldArgs};
use crate::input;
use crate::output::Rendered;

const CURRENT_VOLUME_FIELD: &str = "current volume";
const TARGET_PROFIT_FIELD: &str = "target profit";

/// Arguments for the full break-even analysis
#[derive(Args, Default)]
#[command(allow_hyphen_values = true)]
pub struct AnalyzeArgs {
    /// Sales price per unit
    #[arg(long)]
    pub price: Option<String>,

    /// Variable cost per unit
    #[arg(long)]
    pub variable_cost: Option<String>,

    /// Fixed costs for the period
    #[arg(long)]
    pub fixed_costs: Option<String>,

    /// Units currently sold (margin of safety, operating leverage)
    #[arg(long)]
    pub current_volume: Option<String>,

    /// Profit to reach (target volume)
    #[arg(long)]
    pub target_profit: Option<String>,

    /// Path to JSON or YAML analysis input, including scenarios
    #[arg(long)]
    pub input: Option<String>,
}

/// Analysis input read from a file or stdin. Levels and policy fall back
/// to the resolved options when the document leaves them out.
#[derive(Debug, Deserialize)]
struct AnalysisDocument {
    #[serde(flatten)]
    base: BreakevenInput,
    levels: Option<ProductionLevels>,
    current_volume: Option<Decimal>,
    target_profit: Option<Decimal>,
    scenarios: Option<Vec<ScenarioOverride>>,
    on_invalid_margin: Option<InvalidMarginPolicy>,
}

impl AnalysisDocument {
    fn into_input(self, options: &FormOptions) -> AnalysisInput {
        let mut input = AnalysisInput::new(self.base);
        input.levels = self.levels.unwrap_or_else(|| options.levels.clone());
        input.on_invalid_margin = self.on_invalid_margin.unwrap_or(options.on_invalid_margin);
        input.current_volume = self.current_volume;
        input.target_profit = self.target_profit;
        input.scenarios = self.scenarios;
        input
    }
}

fn optional_decimal(
    field: &str,
    text: Option<&str>,
) -> Result<Option<Decimal>, Box<dyn std::error::Error>> {
    Ok(text.map(|t| parse_decimal(field, t)).transpose()?)
}

fn analysis_input(
    args: AnalyzeArgs,
    options: &FormOptions,
) -> Result<AnalysisInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        let document: AnalysisDocument = input::file::read_input(path)?;
        return Ok(document.into_input(options));
    }

    let flags_given = args.price.is_some() || args.variable_cost.is_some() || args.fixed_costs.is_some();
    if !flags_given {
        if let Some(document) = input::stdin::read_stdin::<AnalysisDocument>()? {
            return Ok(document.into_input(options));
        }
    }

    let current_volume = optional_decimal(CURRENT_VOLUME_FIELD, args.current_volume.as_deref())?;
    let target_profit = optional_decimal(TARGET_PROFIT_FIELD, args.target_profit.as_deref())?;

    let fields = resolve_fields(&FieldArgs {
        price: args.price,
        variable_cost: args.variable_cost,
        fixed_costs: args.fixed_costs,
        input: None,
    })?;

    let mut parsed = AnalysisInput::new(parse_fields(&fields)?);
    parsed.levels = options.levels.clone();
    parsed.on_invalid_margin = options.on_invalid_margin;
    parsed.current_volume = current_volume;
    parsed.target_profit = target_profit;
    Ok(parsed)
}

pub fn run_analyze(
    args: AnalyzeArgs,
    options: &FormOptions,
) -> Result<Rendered, Box<dyn std::error::Error>> {
    let analysis_input = analysis_input(args, options)?;
    tracing::debug!(
        levels = analysis_input.levels.len(),
        on_invalid_margin = ?analysis_input.on_invalid_margin,
        "running analysis"
    );
    let output = analysis::analyze(&analysis_input)?;

    let sheet = ReportSheet::new(
        output.result.break_even.as_ref(),
        &output.result.report,
        &options.display,
    );
    let warnings = output.warnings.clone();

    Ok(Rendered {
        value: serde_json::to_value(&output)?,
        sheet: Some(sheet),
        chart: None,
        warnings,
    })
}
