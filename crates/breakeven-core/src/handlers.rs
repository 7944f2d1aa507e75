//! Form actions: raw field text in, results or a user-facing error out
//! through a [`ResultSink`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analysis::{build_report, compute, BreakevenPoint, ReportRow};
use crate::chart::{build_chart, ChartSpec};
use crate::error::BreakevenError;
use crate::levels::ProductionLevels;
use crate::presentation::DisplayOptions;
use crate::types::{BreakevenInput, InvalidMarginPolicy};
use crate::BreakevenResult;

pub const PRICE_FIELD: &str = "unit price";
pub const VARIABLE_COST_FIELD: &str = "unit variable cost";
pub const FIXED_COSTS_FIELD: &str = "fixed costs";

/// Current text of the three input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub price: String,
    pub variable_cost: String,
    pub fixed_costs: String,
}

impl FormFields {
    pub fn new(price: &str, variable_cost: &str, fixed_costs: &str) -> Self {
        Self {
            price: price.to_string(),
            variable_cost: variable_cost.to_string(),
            fixed_costs: fixed_costs.to_string(),
        }
    }
}

impl From<&BreakevenInput> for FormFields {
    fn from(input: &BreakevenInput) -> Self {
        Self {
            price: input.unit_price.to_string(),
            variable_cost: input.unit_variable_cost.to_string(),
            fixed_costs: input.fixed_costs.to_string(),
        }
    }
}

/// Settings that stay fixed across form actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormOptions {
    pub levels: ProductionLevels,
    pub on_invalid_margin: InvalidMarginPolicy,
    pub display: DisplayOptions,
}

/// Receives whatever a form action produced. Implementations own any
/// state they cache for redisplay.
pub trait ResultSink {
    fn show_break_even(&mut self, point: &BreakevenPoint);
    fn show_report(&mut self, rows: &[ReportRow]);
    fn show_chart(&mut self, chart: &ChartSpec);
    fn notify_error(&mut self, error: &BreakevenError);
}

/// Parse one field. Surrounding whitespace is ignored; scientific
/// notation ("1e3") is accepted.
pub fn parse_decimal(field: &str, text: &str) -> BreakevenResult<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(BreakevenError::parse(field, text));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| BreakevenError::parse(field, text))
}

/// Parse all three fields, failing on the first one that is not a number.
pub fn parse_fields(fields: &FormFields) -> BreakevenResult<BreakevenInput> {
    Ok(BreakevenInput::new(
        parse_decimal(PRICE_FIELD, &fields.price)?,
        parse_decimal(VARIABLE_COST_FIELD, &fields.variable_cost)?,
        parse_decimal(FIXED_COSTS_FIELD, &fields.fixed_costs)?,
    ))
}

/// The "calculate" action: break-even scalars, then the report.
///
/// A parse error is only reported. An invalid margin is reported and,
/// under `Annotate`, the report still follows without the scalars. An
/// overflow is reported and stops the action.
pub fn calculate(fields: &FormFields, options: &FormOptions, sink: &mut impl ResultSink) {
    let input = match parse_fields(fields) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "calculation rejected");
            sink.notify_error(&e);
            return;
        }
    };

    match compute(&input) {
        Ok(point) => {
            tracing::debug!(units = %point.units, revenue = %point.revenue, "break-even computed");
            sink.show_break_even(&point);
        }
        Err(e) => {
            sink.notify_error(&e);
            let annotate = matches!(e, BreakevenError::InvalidMargin { .. })
                && options.on_invalid_margin == InvalidMarginPolicy::Annotate;
            if !annotate {
                return;
            }
        }
    }

    match build_report(&input, options.levels.as_slice()) {
        Ok(rows) => sink.show_report(&rows),
        Err(e) => sink.notify_error(&e),
    }
}

/// The "show chart" action. Under `Annotate`, an invalid margin is
/// reported and the chart is still drawn without the break-even marker.
pub fn show_chart(fields: &FormFields, options: &FormOptions, sink: &mut impl ResultSink) {
    let input = match parse_fields(fields) {
        Ok(input) => input,
        Err(e) => {
            tracing::debug!(error = %e, "chart rejected");
            sink.notify_error(&e);
            return;
        }
    };

    let compute_error = compute(&input).err();
    if let Some(e) = &compute_error {
        sink.notify_error(e);
    }

    match build_chart(
        &input,
        &options.levels,
        options.on_invalid_margin,
        &options.display.currency_symbol,
    ) {
        Ok(chart) => sink.show_chart(&chart),
        Err(e) if compute_error.as_ref() == Some(&e) => {
            tracing::debug!(error = %e, "chart suppressed")
        }
        Err(e) => sink.notify_error(&e),
    }
}
