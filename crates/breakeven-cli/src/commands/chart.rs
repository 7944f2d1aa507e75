use serde_json::json;

use breakeven_core::handlers::{self, FormOptions};

use super::{resolve_fields, CollectingSink, FieldArgs};
use crate::output::Rendered;

pub fn run_chart(
    args: FieldArgs,
    options: &FormOptions,
) -> Result<Rendered, Box<dyn std::error::Error>> {
    let fields = resolve_fields(&args)?;
    let mut sink = CollectingSink::default();
    handlers::show_chart(&fields, options, &mut sink);

    let warnings = sink.warnings();
    let chart = match sink.chart.take() {
        Some(chart) => chart,
        None => return Err(sink.into_error()),
    };

    Ok(Rendered {
        value: json!({ "result": chart, "warnings": warnings }),
        sheet: None,
        chart: Some(chart),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(price: &str) -> FieldArgs {
        FieldArgs {
            price: Some(price.to_string()),
            variable_cost: Some("6".to_string()),
            fixed_costs: Some("8000".to_string()),
            input: None,
        }
    }

    #[test]
    fn test_chart_spec_in_json() {
        let rendered = run_chart(args("10"), &FormOptions::default()).unwrap();
        assert_eq!(rendered.value["result"]["title"], "Break-even Chart");
        assert_eq!(rendered.value["result"]["annotation"]["units"], "2000");
        assert!(rendered.chart.is_some());
    }

    #[test]
    fn test_chart_invalid_margin_renders_with_warning() {
        let rendered = run_chart(args("6"), &FormOptions::default()).unwrap();
        assert!(rendered.chart.unwrap().annotation.is_none());
        assert_eq!(rendered.warnings.len(), 1);
    }

    #[test]
    fn test_chart_overflow_is_error() {
        let err = run_chart(args("1e26"), &FormOptions::default()).unwrap_err();
        assert!(err.to_string().contains("chart revenue"));
    }

    #[test]
    fn test_chart_parse_error() {
        assert!(run_chart(args("ten"), &FormOptions::default()).is_err());
    }
}
