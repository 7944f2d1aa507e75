pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use serde_json::Value;
use std::io;

use breakeven_core::chart::ChartSpec;
use breakeven_core::presentation::ReportSheet;

use crate::chart_view;
use crate::OutputFormat;

/// What a command produced, ready for any output format.
#[derive(Debug)]
pub struct Rendered {
    /// Machine-readable form (json output, minimal lookups)
    pub value: Value,
    /// Formatted scalars and report rows (table, csv)
    pub sheet: Option<ReportSheet>,
    /// Drawn in the terminal for table/minimal output
    pub chart: Option<ChartSpec>,
    pub warnings: Vec<String>,
}

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, rendered: &Rendered) -> io::Result<()> {
    if let Some(chart) = &rendered.chart {
        match format {
            OutputFormat::Json => json::print_json(&rendered.value),
            OutputFormat::Csv => csv_out::print_chart_points(chart),
            OutputFormat::Table | OutputFormat::Minimal => chart_view::draw(chart)?,
        }
        return Ok(());
    }

    match (format, &rendered.sheet) {
        (OutputFormat::Table, Some(sheet)) => table::print_sheet(sheet, &rendered.value),
        (OutputFormat::Csv, Some(sheet)) => csv_out::print_sheet(sheet),
        (OutputFormat::Minimal, _) => minimal::print_minimal(&rendered.value),
        // Nothing tabular to show
        (OutputFormat::Json, _) | (_, None) => json::print_json(&rendered.value),
    }
    Ok(())
}
