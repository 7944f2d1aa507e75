use serde_json::json;

use breakeven_core::handlers::{self, FormOptions};
use breakeven_core::presentation::ReportSheet;

use super::{resolve_fields, CollectingSink, FieldArgs};
use crate::output::Rendered;

pub fn run_compute(
    args: FieldArgs,
    options: &FormOptions,
) -> Result<Rendered, Box<dyn std::error::Error>> {
    let fields = resolve_fields(&args)?;
    let mut sink = CollectingSink::default();
    handlers::calculate(&fields, options, &mut sink);

    let point = match sink.point {
        Some(point) => point,
        None => return Err(sink.into_error()),
    };

    Ok(Rendered {
        value: json!({ "result": point }),
        sheet: Some(ReportSheet::new(Some(&point), &[], &options.display)),
        chart: None,
        warnings: Vec::new(),
    })
}

pub fn run_report(
    args: FieldArgs,
    options: &FormOptions,
) -> Result<Rendered, Box<dyn std::error::Error>> {
    let fields = resolve_fields(&args)?;
    let mut sink = CollectingSink::default();
    handlers::calculate(&fields, options, &mut sink);

    let warnings = sink.warnings();
    let rows = match sink.rows.take() {
        Some(rows) => rows,
        None => return Err(sink.into_error()),
    };

    Ok(Rendered {
        value: json!({
            "result": {
                "break_even": sink.point,
                "report": rows,
            },
            "warnings": warnings,
        }),
        sheet: Some(ReportSheet::new(sink.point.as_ref(), &rows, &options.display)),
        chart: None,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use breakeven_core::InvalidMarginPolicy;

    fn args(price: &str, variable_cost: &str, fixed_costs: &str) -> FieldArgs {
        FieldArgs {
            price: Some(price.to_string()),
            variable_cost: Some(variable_cost.to_string()),
            fixed_costs: Some(fixed_costs.to_string()),
            input: None,
        }
    }

    #[test]
    fn test_compute_json_and_sheet() {
        let rendered = run_compute(args("10", "6", "8000"), &FormOptions::default()).unwrap();
        assert_eq!(rendered.value["result"]["units"], "2000");
        assert_eq!(rendered.value["result"]["revenue"], "20000");
        let sheet = rendered.sheet.unwrap();
        assert_eq!(sheet.break_even_revenue.as_deref(), Some("Q20000.00"));
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_compute_parse_error() {
        let err = run_compute(args("abc", "6", "8000"), &FormOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'abc' is not a valid number"));
    }

    #[test]
    fn test_compute_invalid_margin() {
        let err = run_compute(args("5", "5", "1000"), &FormOptions::default()).unwrap_err();
        assert!(err.to_string().contains("must be greater than"));
    }

    #[test]
    fn test_report_rows() {
        let rendered = run_report(args("10", "6", "8000"), &FormOptions::default()).unwrap();
        let rows = rendered.value["result"]["report"].as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[2]["profit_loss"], "12000");
        assert!(rendered.warnings.is_empty());
    }

    #[test]
    fn test_report_invalid_margin_annotate_warns() {
        let rendered = run_report(args("5", "5", "1000"), &FormOptions::default()).unwrap();
        assert!(rendered.value["result"]["break_even"].is_null());
        assert_eq!(rendered.warnings.len(), 1);
        assert!(rendered.sheet.unwrap().break_even_units.is_none());
    }

    #[test]
    fn test_report_overflow_is_error() {
        let err = run_report(args("1e26", "1", "8000"), &FormOptions::default()).unwrap_err();
        assert!(err.to_string().contains("overflow"));
        let err = run_compute(
            args("10", "9.999999999999999999999999999", "8000"),
            &FormOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("break-even units"));
    }

    #[test]
    fn test_report_invalid_margin_suppress_fails() {
        let options = FormOptions {
            on_invalid_margin: InvalidMarginPolicy::Suppress,
            ..FormOptions::default()
        };
        assert!(run_report(args("5", "5", "1000"), &options).is_err());
    }
}
