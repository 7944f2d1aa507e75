use breakeven_core::analysis::{self, AnalysisInput};
use breakeven_core::handlers::{parse_fields, FormFields};
use breakeven_core::levels::{ProductionLevels, DEFAULT_LEVELS};
use breakeven_core::presentation::{format_money, format_units, DisplayOptions, ReportSheet};
use breakeven_core::{BreakevenError, BreakevenInput, InvalidMarginPolicy};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn valid_inputs() -> Vec<BreakevenInput> {
    vec![
        BreakevenInput::new(dec!(10), dec!(6), dec!(8000)),
        BreakevenInput::new(dec!(50), dec!(30), dec!(10000)),
        BreakevenInput::new(dec!(3), dec!(0.01), dec!(0)),
        BreakevenInput::new(dec!(19.99), dec!(7.35), dec!(12345.67)),
        BreakevenInput::new(dec!(1000), dec!(999), dec!(250000)),
    ]
}

// ===========================================================================
// Break-even point
// ===========================================================================

#[test]
fn test_breakeven_units_and_revenue_identity() {
    for input in valid_inputs() {
        let point = analysis::compute(&input).unwrap();
        let expected_units = input.fixed_costs / (input.unit_price - input.unit_variable_cost);
        assert_eq!(point.units, expected_units);
        let diff = (point.units * input.unit_price - point.revenue).abs();
        assert!(diff < dec!(0.0000001), "revenue mismatch for {:?}", input);
    }
}

#[test]
fn test_price_not_above_cost_is_invalid_margin() {
    let cases = [
        (dec!(5), dec!(5)),
        (dec!(4.99), dec!(5)),
        (dec!(0), dec!(0)),
        (dec!(0), dec!(1)),
    ];
    for (price, cost) in cases {
        let input = BreakevenInput::new(price, cost, dec!(1000));
        assert_eq!(
            analysis::compute(&input),
            Err(BreakevenError::InvalidMargin {
                price,
                variable_cost: cost,
            })
        );
    }
}

#[test]
fn test_known_answer_example() {
    let input = BreakevenInput::new(dec!(10), dec!(6), dec!(8000));
    let point = analysis::compute(&input).unwrap();
    assert_eq!(format_units(point.units), "2000.00");
    assert_eq!(format_money(point.revenue, "Q"), "Q20000.00");
}

// ===========================================================================
// Report
// ===========================================================================

#[test]
fn test_profit_loss_matches_margin_formula() {
    for input in valid_inputs() {
        let rows = analysis::build_report(&input, &DEFAULT_LEVELS).unwrap();
        for row in &rows {
            let expected =
                (input.unit_price - input.unit_variable_cost) * row.units - input.fixed_costs;
            assert_eq!(row.profit_loss, expected);
        }
    }
}

#[test]
fn test_profit_loss_strictly_increasing() {
    for input in valid_inputs() {
        let rows = analysis::build_report(&input, &DEFAULT_LEVELS).unwrap();
        for pair in rows.windows(2) {
            assert!(
                pair[1].profit_loss > pair[0].profit_loss,
                "not increasing for {:?}",
                input
            );
        }
    }
}

#[test]
fn test_report_row_5000_known_answer() {
    let input = BreakevenInput::new(dec!(10), dec!(6), dec!(8000));
    let point = analysis::compute(&input).unwrap();
    let rows = analysis::build_report(&input, &DEFAULT_LEVELS).unwrap();
    let sheet = ReportSheet::new(Some(&point), &rows, &DisplayOptions::default());
    let row = sheet
        .rows
        .iter()
        .find(|r| r.cells[0] == "5000")
        .expect("row for 5000 units");
    assert_eq!(
        row.cells[1..].to_vec(),
        vec!["Q50000.00", "Q30000.00", "Q20000.00", "Q8000.00", "Q12000.00"]
    );
}

#[test]
fn test_compute_and_report_are_idempotent() {
    let input = BreakevenInput::new(dec!(19.99), dec!(7.35), dec!(12345.67));
    assert_eq!(analysis::compute(&input), analysis::compute(&input));
    assert_eq!(
        analysis::build_report(&input, &DEFAULT_LEVELS),
        analysis::build_report(&input, &DEFAULT_LEVELS)
    );
    assert_eq!(
        analysis::build_series(&input, &DEFAULT_LEVELS),
        analysis::build_series(&input, &DEFAULT_LEVELS)
    );
}

#[test]
fn test_series_crosses_at_break_even() {
    // Revenue and total cost are equal exactly at the break-even units.
    let input = BreakevenInput::new(dec!(10), dec!(6), dec!(8000));
    let point = analysis::compute(&input).unwrap();
    let series = analysis::build_series(&input, &[point.units]).unwrap();
    assert_eq!(series.revenue[0], series.total_cost[0]);
}

// ===========================================================================
// Full analysis and parsing
// ===========================================================================

#[test]
fn test_analysis_with_custom_levels() {
    let mut input = AnalysisInput::new(BreakevenInput::new(dec!(10), dec!(6), dec!(8000)));
    input.levels = ProductionLevels::new(vec![dec!(1000), dec!(2000), dec!(3000)]).unwrap();
    let out = analysis::analyze(&input).unwrap();
    let profits: Vec<Decimal> = out.result.report.iter().map(|r| r.profit_loss).collect();
    assert_eq!(profits, vec![dec!(-4000), dec!(0), dec!(4000)]);
    assert_eq!(out.result.series.levels.len(), 3);
}

#[test]
fn test_suppress_policy_from_json_input() {
    let input: AnalysisInput = serde_json::from_str(
        r#"{
            "unit_price": "5",
            "unit_variable_cost": "5",
            "fixed_costs": "1000",
            "on_invalid_margin": "suppress"
        }"#,
    )
    .unwrap();
    assert_eq!(input.on_invalid_margin, InvalidMarginPolicy::Suppress);
    assert!(analysis::analyze(&input).is_err());
}

#[test]
fn test_extreme_parseable_inputs_fail_without_panicking() {
    let extremes = [
        ("1e26", "1", "8000"),
        ("10", "9.999999999999999999999999999", "8000"),
        ("79228162514264337593543950335", "-79228162514264337593543950335", "1"),
        ("1e28", "0", "1e28"),
        ("0.0000000000000000000000000001", "0", "79228162514264337593543950335"),
    ];
    for (price, variable_cost, fixed_costs) in extremes {
        let base = parse_fields(&FormFields::new(price, variable_cost, fixed_costs)).unwrap();
        for policy in [InvalidMarginPolicy::Annotate, InvalidMarginPolicy::Suppress] {
            let mut input = AnalysisInput::new(base);
            input.on_invalid_margin = policy;
            input.current_volume = Some(dec!(5000));
            input.target_profit = Some(dec!(1000));
            let result = analysis::analyze(&input);
            assert!(
                matches!(result, Err(BreakevenError::Overflow { .. })),
                "expected overflow for ({price}, {variable_cost}, {fixed_costs})"
            );
        }
    }
}

#[test]
fn test_non_numeric_price_is_parse_error() {
    let result = parse_fields(&FormFields::new("abc", "6", "8000"));
    assert!(matches!(result, Err(BreakevenError::Parse { .. })));
}

#[cfg(feature = "scenarios")]
#[test]
fn test_analysis_with_scenarios() {
    use breakeven_core::scenarios::ScenarioOverride;

    let mut input = AnalysisInput::new(BreakevenInput::new(dec!(10), dec!(6), dec!(8000)));
    input.current_volume = Some(dec!(3000));
    input.scenarios = Some(vec![ScenarioOverride {
        name: "Price +10%".to_string(),
        price_change_pct: Some(dec!(0.10)),
        variable_cost_change_pct: None,
        fixed_cost_change_pct: None,
    }]);
    let out = analysis::analyze(&input).unwrap();
    let scenario = &out.result.scenario_results[0];
    // price 11, CM 5, BE 1600; profit at 3000 = 15000 - 8000 = 7000
    assert_eq!(scenario.breakeven_units, dec!(1600));
    assert_eq!(scenario.profit_at_current_volume, Some(dec!(7000)));
}
