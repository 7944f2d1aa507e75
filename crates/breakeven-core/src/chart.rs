use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::{build_series, compute, BreakevenPoint, ChartSeries};
use crate::error::BreakevenError;
use crate::levels::ProductionLevels;
use crate::types::{BreakevenInput, InvalidMarginPolicy, Money, Units};
use crate::BreakevenResult;

pub const CHART_TITLE: &str = "Break-even Chart";
pub const X_AXIS_LABEL: &str = "Units";
pub const Y_AXIS_LABEL: &str = "Amount";
pub const REVENUE_LABEL: &str = "Revenue";
pub const TOTAL_COST_LABEL: &str = "Total cost";

/// A labelled polyline through (units, amount) points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polyline {
    pub label: String,
    pub points: Vec<(Units, Money)>,
}

/// Dashed reference lines through the break-even point plus its marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakevenMarker {
    /// x of the vertical reference line
    pub units: Units,
    /// y of the horizontal reference line
    pub revenue: Money,
    pub units_label: String,
    pub revenue_label: String,
}

/// Everything a plotting collaborator needs to draw the break-even chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (Units, Units),
    pub y_range: (Money, Money),
    pub revenue: Polyline,
    pub total_cost: Polyline,
    pub annotation: Option<BreakevenMarker>,
}

/// Build the chart over `levels`. With `Annotate`, a missing break-even
/// point only drops the annotation; with `Suppress` it is an error.
pub fn build_chart(
    input: &BreakevenInput,
    levels: &ProductionLevels,
    policy: InvalidMarginPolicy,
    currency_symbol: &str,
) -> BreakevenResult<ChartSpec> {
    let point = match compute(input) {
        Ok(point) => Some(point),
        Err(e @ BreakevenError::InvalidMargin { .. }) => match policy {
            InvalidMarginPolicy::Suppress => return Err(e),
            InvalidMarginPolicy::Annotate => None,
        },
        Err(e) => return Err(e),
    };

    let series = build_series(input, levels.as_slice())?;
    Ok(chart_from_series(&series, levels, point.as_ref(), currency_symbol))
}

/// Assemble a chart from an already-computed series and optional point.
pub fn chart_from_series(
    series: &ChartSeries,
    levels: &ProductionLevels,
    point: Option<&BreakevenPoint>,
    currency_symbol: &str,
) -> ChartSpec {
    let annotation = point.map(|p| BreakevenMarker {
        units: p.units,
        revenue: p.revenue,
        units_label: format!(
            "Break-even ({} units)",
            crate::presentation::format_units(p.units)
        ),
        revenue_label: format!(
            "Break-even ({})",
            crate::presentation::format_money(p.revenue, currency_symbol)
        ),
    });

    ChartSpec {
        title: CHART_TITLE.to_string(),
        x_label: X_AXIS_LABEL.to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        x_range: levels.padded_range(),
        y_range: y_range(series, point),
        revenue: polyline(REVENUE_LABEL, &series.levels, &series.revenue),
        total_cost: polyline(TOTAL_COST_LABEL, &series.levels, &series.total_cost),
        annotation,
    }
}

fn polyline(label: &str, xs: &[Units], ys: &[Money]) -> Polyline {
    Polyline {
        label: label.to_string(),
        points: xs.iter().copied().zip(ys.iter().copied()).collect(),
    }
}

/// From zero (or the lowest value if negative) to the highest value,
/// including the break-even revenue. The x range stays on the padded
/// level domain, so a break-even volume outside it falls off the chart.
fn y_range(series: &ChartSeries, point: Option<&BreakevenPoint>) -> (Money, Money) {
    let values = series
        .revenue
        .iter()
        .chain(series.total_cost.iter())
        .copied()
        .chain(point.map(|p| p.revenue));

    let (lo, hi) = values.fold((Decimal::ZERO, Decimal::ZERO), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    (lo, hi)
}
