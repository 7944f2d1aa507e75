use serde_json::{Map, Value};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{builder::Builder, Table};

use breakeven_core::analysis::RowBand;
use breakeven_core::presentation::ReportSheet;

/// Result fields already shown by the sheet itself.
const SHEET_FIELDS: [&str; 5] = ["break_even", "report", "series", "units", "revenue"];

/// Break-even scalars, the banded report and any remaining result fields.
pub fn print_sheet(sheet: &ReportSheet, envelope: &Value) {
    println!("{}", scalar_table(sheet));

    if !sheet.rows.is_empty() {
        let banded = atty::is(atty::Stream::Stdout);
        println!("\n{}", report_table(sheet, banded));
    }

    if let Some(Value::Object(result)) = envelope.get("result") {
        print_extras(result);
    }

    print_notes(envelope);
}

fn scalar_table(sheet: &ReportSheet) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Break-even", "Value"]);
    builder.push_record([
        "Units",
        sheet.break_even_units.as_deref().unwrap_or("n/a"),
    ]);
    builder.push_record([
        "Revenue",
        sheet.break_even_revenue.as_deref().unwrap_or("n/a"),
    ]);
    Table::from(builder)
}

/// Six-column report; odd rows get a background band when `banded`.
pub fn report_table(sheet: &ReportSheet, banded: bool) -> Table {
    let mut builder = Builder::default();
    builder.push_record(sheet.headers.iter().cloned());
    for row in &sheet.rows {
        builder.push_record(row.cells.iter().cloned());
    }

    let mut table = Table::from(builder);
    table.with(Style::modern());

    if banded {
        for (i, row) in sheet.rows.iter().enumerate() {
            if row.band == RowBand::Odd {
                // +1 for the header row
                table.with(Modify::new(Rows::single(i + 1)).with(Color::BG_BLUE));
            }
        }
    }
    table
}

fn print_extras(result: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalar_count = 0;
    let mut tables: Vec<(&str, &[Value])> = Vec::new();

    for (key, val) in result {
        if SHEET_FIELDS.contains(&key.as_str()) || val.is_null() {
            continue;
        }
        match val {
            Value::Array(arr) if arr.is_empty() => {}
            Value::Array(arr) if arr.iter().all(Value::is_object) => tables.push((key.as_str(), arr.as_slice())),
            _ => {
                builder.push_record([key.as_str(), &format_value(val)]);
                scalar_count += 1;
            }
        }
    }

    if scalar_count > 0 {
        println!("\n{}", Table::from(builder));
    }
    for (key, arr) in tables {
        println!("\n{}:", key);
        print_array_table(arr);
    }
}

fn print_notes(envelope: &Value) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
