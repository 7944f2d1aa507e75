use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use breakeven_core::analysis::{self, AnalysisInput, BreakevenPoint, ReportRow};
use breakeven_core::chart;
use breakeven_core::handlers::{parse_fields, FormFields};
use breakeven_core::{BreakevenError, InvalidMarginPolicy};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

#[derive(Serialize)]
struct ReportOutput {
    break_even: Option<BreakevenPoint>,
    report: Vec<ReportRow>,
    warnings: Vec<String>,
}

/// Break-even point for `price`, `variableCost` and `fixedCosts` given as
/// the raw text typed into the form.
#[napi]
pub fn compute_breakeven(
    price: String,
    variable_cost: String,
    fixed_costs: String,
) -> NapiResult<String> {
    let fields = FormFields::new(&price, &variable_cost, &fixed_costs);
    let input = parse_fields(&fields).map_err(to_napi_error)?;
    let point = analysis::compute(&input).map_err(to_napi_error)?;
    serde_json::to_string(&point).map_err(to_napi_error)
}

#[napi]
pub fn build_report(input_json: String) -> NapiResult<String> {
    let input: AnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut warnings = Vec::new();

    let break_even = match analysis::compute(&input.base) {
        Ok(point) => Some(point),
        Err(e @ BreakevenError::InvalidMargin { .. }) => match input.on_invalid_margin {
            InvalidMarginPolicy::Suppress => return Err(to_napi_error(e)),
            InvalidMarginPolicy::Annotate => {
                warnings.push(e.to_string());
                None
            }
        },
        Err(e) => return Err(to_napi_error(e)),
    };

    let output = ReportOutput {
        break_even,
        report: analysis::build_report(&input.base, input.levels.as_slice())
            .map_err(to_napi_error)?,
        warnings,
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_chart(input_json: String, currency_symbol: Option<String>) -> NapiResult<String> {
    let input: AnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let symbol = currency_symbol
        .unwrap_or_else(|| breakeven_core::presentation::DEFAULT_CURRENCY_SYMBOL.to_string());
    let drawn = chart::build_chart(&input.base, &input.levels, input.on_invalid_margin, &symbol)
        .map_err(to_napi_error)?;
    serde_json::to_string(&drawn).map_err(to_napi_error)
}

#[napi]
pub fn analyze_breakeven(input_json: String) -> NapiResult<String> {
    let input: AnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = analysis::analyze(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
