pub mod analyze;
pub mod calculate;
pub mod chart;

use clap::Args;

use breakeven_core::analysis::{BreakevenPoint, ReportRow};
use breakeven_core::chart::ChartSpec;
use breakeven_core::handlers::{FormFields, ResultSink};
use breakeven_core::{BreakevenError, BreakevenInput};

use crate::input;

/// The three form fields, as free text
#[derive(Args, Default)]
#[command(allow_hyphen_values = true)]
pub struct FieldArgs {
    /// Sales price per unit
    #[arg(long)]
    pub price: Option<String>,

    /// Variable cost per unit
    #[arg(long)]
    pub variable_cost: Option<String>,

    /// Fixed costs for the period
    #[arg(long)]
    pub fixed_costs: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Field text from `--input`, the flags, or JSON on stdin, in that order.
pub fn resolve_fields(args: &FieldArgs) -> Result<FormFields, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        let parsed: BreakevenInput = input::file::read_input(path)?;
        return Ok(FormFields::from(&parsed));
    }

    if args.price.is_some() || args.variable_cost.is_some() || args.fixed_costs.is_some() {
        return Ok(FormFields {
            price: args
                .price
                .clone()
                .ok_or("--price is required (or provide --input)")?,
            variable_cost: args
                .variable_cost
                .clone()
                .ok_or("--variable-cost is required (or provide --input)")?,
            fixed_costs: args
                .fixed_costs
                .clone()
                .ok_or("--fixed-costs is required (or provide --input)")?,
        });
    }

    if let Some(parsed) = input::stdin::read_stdin::<BreakevenInput>()? {
        return Ok(FormFields::from(&parsed));
    }

    Err("--price, --variable-cost and --fixed-costs (or --input <file>, or JSON on stdin) required".into())
}

/// Keeps whatever a form action pushed so the command can render it.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub point: Option<BreakevenPoint>,
    pub rows: Option<Vec<ReportRow>>,
    pub chart: Option<ChartSpec>,
    pub errors: Vec<BreakevenError>,
}

impl CollectingSink {
    /// First reported error, for commands that produced nothing to render.
    pub fn into_error(mut self) -> Box<dyn std::error::Error> {
        if self.errors.is_empty() {
            "nothing to display".into()
        } else {
            Box::new(self.errors.swap_remove(0))
        }
    }

    /// Errors that did not stop rendering become warnings.
    pub fn warnings(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

impl ResultSink for CollectingSink {
    fn show_break_even(&mut self, point: &BreakevenPoint) {
        self.point = Some(*point);
    }

    fn show_report(&mut self, rows: &[ReportRow]) {
        self.rows = Some(rows.to_vec());
    }

    fn show_chart(&mut self, chart: &ChartSpec) {
        self.chart = Some(chart.clone());
    }

    fn notify_error(&mut self, error: &BreakevenError) {
        tracing::info!(%error, "form action reported an error");
        self.errors.push(error.clone());
    }
}
