use std::io::{self, Write};

use breakeven_core::chart::ChartSpec;
use breakeven_core::presentation::ReportSheet;

/// Report rows under the sheet headers, or the break-even scalars as
/// field,value pairs when the sheet has no rows.
pub fn print_sheet(sheet: &ReportSheet) {
    let _ = write_sheet(io::stdout().lock(), sheet);
}

/// One line per chart point: series,units,amount.
pub fn print_chart_points(chart: &ChartSpec) {
    let _ = write_chart_points(io::stdout().lock(), chart);
}

fn write_sheet<W: Write>(out: W, sheet: &ReportSheet) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    if sheet.rows.is_empty() {
        wtr.write_record(["field", "value"])?;
        wtr.write_record(["break_even_units", sheet.break_even_units.as_deref().unwrap_or("")])?;
        wtr.write_record([
            "break_even_revenue",
            sheet.break_even_revenue.as_deref().unwrap_or(""),
        ])?;
    } else {
        wtr.write_record(&sheet.headers)?;
        for row in &sheet.rows {
            wtr.write_record(&row.cells)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn write_chart_points<W: Write>(out: W, chart: &ChartSpec) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["series", "units", "amount"])?;
    for line in [&chart.revenue, &chart.total_cost] {
        for (x, y) in &line.points {
            wtr.write_record([line.label.as_str(), &x.to_string(), &y.to_string()])?;
        }
    }
    if let Some(marker) = &chart.annotation {
        wtr.write_record([
            "Break-even",
            &marker.units.to_string(),
            &marker.revenue.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
