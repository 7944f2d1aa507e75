use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BreakevenError;
use crate::levels::ProductionLevels;
use crate::types::{with_metadata, BreakevenInput, ComputationOutput, InvalidMarginPolicy, Money, Rate, Units};
use crate::BreakevenResult;

#[cfg(feature = "scenarios")]
use crate::scenarios::{self, ScenarioOverride, ScenarioResult};

// ---------------------------------------------------------------------------
// Types: Break-even point
// ---------------------------------------------------------------------------

/// Volume and revenue at which contribution margin exactly covers fixed costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakevenPoint {
    /// Fixed costs / contribution margin
    pub units: Units,
    /// units * price
    pub revenue: Money,
    /// Price - variable cost per unit
    pub contribution_margin: Money,
    /// CM / price
    pub contribution_margin_ratio: Rate,
}

// ---------------------------------------------------------------------------
// Types: Production-level report
// ---------------------------------------------------------------------------

/// Alternating display band of a report row, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowBand {
    Even,
    Odd,
}

impl RowBand {
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            RowBand::Even
        } else {
            RowBand::Odd
        }
    }
}

/// Income statement at one production quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub units: Units,
    /// price * units
    pub revenue: Money,
    /// variable cost * units
    pub variable_cost: Money,
    /// revenue - variable cost
    pub contribution_margin: Money,
    pub fixed_cost: Money,
    /// contribution margin - fixed cost
    pub profit_loss: Money,
    pub band: RowBand,
}

/// Revenue and total-cost values over the production levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub levels: Vec<Units>,
    pub revenue: Vec<Money>,
    pub total_cost: Vec<Money>,
}

// ---------------------------------------------------------------------------
// Types: Full analysis
// ---------------------------------------------------------------------------

/// Input for the full break-even analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(flatten)]
    pub base: BreakevenInput,
    /// Report and chart quantities; the default five levels when absent
    #[serde(default)]
    pub levels: ProductionLevels,
    /// Units currently sold, for margin of safety and operating leverage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_volume: Option<Units>,
    /// Profit target for the target-volume calculation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_profit: Option<Money>,
    /// What-if scenarios
    #[cfg(feature = "scenarios")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenarios: Option<Vec<ScenarioOverride>>,
    #[serde(default)]
    pub on_invalid_margin: InvalidMarginPolicy,
}

impl AnalysisInput {
    pub fn new(base: BreakevenInput) -> Self {
        Self {
            base,
            levels: ProductionLevels::default(),
            current_volume: None,
            target_profit: None,
            #[cfg(feature = "scenarios")]
            scenarios: None,
            on_invalid_margin: InvalidMarginPolicy::default(),
        }
    }
}

/// Position of the current volume relative to the break-even point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginOfSafety {
    pub current_volume: Units,
    /// current_volume - breakeven units
    pub units: Units,
    /// units / current_volume
    pub ratio: Rate,
    /// CM * current_volume - fixed costs
    pub current_profit: Money,
    /// Degree of operating leverage: CM * volume / profit
    pub operating_leverage: Decimal,
}

/// Full break-even analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakevenAnalysis {
    /// Absent when price does not exceed variable cost
    pub break_even: Option<BreakevenPoint>,
    pub report: Vec<ReportRow>,
    pub series: ChartSeries,
    /// (fixed costs + target profit) / CM
    pub target_volume: Option<Units>,
    pub margin_of_safety: Option<MarginOfSafety>,
    #[cfg(feature = "scenarios")]
    pub scenario_results: Vec<ScenarioResult>,
}

// ---------------------------------------------------------------------------
// Checked arithmetic
// ---------------------------------------------------------------------------

// Decimal operators panic on overflow; every figure derived from user input
// goes through these instead.

fn mul(a: Decimal, b: Decimal, context: &str) -> BreakevenResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| BreakevenError::overflow(context))
}

fn div(a: Decimal, b: Decimal, context: &str) -> BreakevenResult<Decimal> {
    a.checked_div(b)
        .ok_or_else(|| BreakevenError::overflow(context))
}

fn add(a: Decimal, b: Decimal, context: &str) -> BreakevenResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| BreakevenError::overflow(context))
}

fn sub(a: Decimal, b: Decimal, context: &str) -> BreakevenResult<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| BreakevenError::overflow(context))
}

// ---------------------------------------------------------------------------
// Function 1: compute
// ---------------------------------------------------------------------------

/// Break-even units and revenue. Fails when price does not exceed
/// variable cost; other values (negative, zero) pass through unchecked.
pub fn compute(input: &BreakevenInput) -> BreakevenResult<BreakevenPoint> {
    let contribution_margin = input.unit_contribution_margin()?;

    if contribution_margin <= dec!(0) {
        return Err(BreakevenError::InvalidMargin {
            price: input.unit_price,
            variable_cost: input.unit_variable_cost,
        });
    }

    // Break-even units = FC / CM
    let units = div(input.fixed_costs, contribution_margin, "break-even units")?;
    let revenue = mul(units, input.unit_price, "break-even revenue")?;

    let contribution_margin_ratio = if input.unit_price == dec!(0) {
        Decimal::ZERO
    } else {
        div(contribution_margin, input.unit_price, "contribution margin ratio")?
    };

    Ok(BreakevenPoint {
        units,
        revenue,
        contribution_margin,
        contribution_margin_ratio,
    })
}

// ---------------------------------------------------------------------------
// Function 2: build_report
// ---------------------------------------------------------------------------

/// One report row per level, in the given order. Does not require a
/// valid break-even point; fails only when a figure overflows.
pub fn build_report(input: &BreakevenInput, levels: &[Units]) -> BreakevenResult<Vec<ReportRow>> {
    levels
        .iter()
        .enumerate()
        .map(|(i, &units)| {
            let revenue = mul(input.unit_price, units, "report revenue")?;
            let variable_cost = mul(input.unit_variable_cost, units, "report variable cost")?;
            let contribution_margin = sub(revenue, variable_cost, "report contribution margin")?;
            Ok(ReportRow {
                units,
                revenue,
                variable_cost,
                contribution_margin,
                fixed_cost: input.fixed_costs,
                profit_loss: sub(contribution_margin, input.fixed_costs, "report profit/loss")?,
                band: RowBand::for_index(i),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Function 3: build_series
// ---------------------------------------------------------------------------

/// Revenue (P * Q) and total cost (F + V * Q) at each level.
pub fn build_series(input: &BreakevenInput, levels: &[Units]) -> BreakevenResult<ChartSeries> {
    let revenue = levels
        .iter()
        .map(|&q| mul(input.unit_price, q, "chart revenue"))
        .collect::<BreakevenResult<Vec<Money>>>()?;
    let total_cost = levels
        .iter()
        .map(|&q| {
            let variable = mul(input.unit_variable_cost, q, "chart total cost")?;
            add(input.fixed_costs, variable, "chart total cost")
        })
        .collect::<BreakevenResult<Vec<Money>>>()?;

    Ok(ChartSeries {
        levels: levels.to_vec(),
        revenue,
        total_cost,
    })
}

// ---------------------------------------------------------------------------
// Function 4: target_volume / margin_of_safety
// ---------------------------------------------------------------------------

/// Units required to earn `target_profit`.
pub fn target_volume(input: &BreakevenInput, target_profit: Money) -> BreakevenResult<Units> {
    let point = compute(input)?;
    volume_for_profit(input, &point, target_profit)
}

fn volume_for_profit(
    input: &BreakevenInput,
    point: &BreakevenPoint,
    target_profit: Money,
) -> BreakevenResult<Units> {
    let required = add(input.fixed_costs, target_profit, "target volume")?;
    div(required, point.contribution_margin, "target volume")
}

/// Margin of safety and operating leverage at `current_volume`. Undefined
/// ratios are reported as zero with a warning.
pub fn margin_of_safety(
    input: &BreakevenInput,
    point: &BreakevenPoint,
    current_volume: Units,
    warnings: &mut Vec<String>,
) -> BreakevenResult<MarginOfSafety> {
    let units = sub(current_volume, point.units, "margin of safety")?;
    let ratio = if current_volume == dec!(0) {
        warnings.push("Current volume is zero; margin of safety is undefined".to_string());
        Decimal::ZERO
    } else {
        div(units, current_volume, "margin of safety ratio")?
    };

    let total_cm = mul(point.contribution_margin, current_volume, "current contribution")?;
    let current_profit = sub(total_cm, input.fixed_costs, "current profit")?;
    let operating_leverage = if current_profit == dec!(0) {
        warnings
            .push("Current profit is zero; operating leverage is undefined (set to 0)".to_string());
        Decimal::ZERO
    } else {
        div(total_cm, current_profit, "operating leverage")?
    };

    Ok(MarginOfSafety {
        current_volume,
        units,
        ratio,
        current_profit,
        operating_leverage,
    })
}

/// Profit at `volume`: CM * volume - fixed costs.
#[cfg(feature = "scenarios")]
pub(crate) fn profit_at(
    contribution_margin: Money,
    fixed_costs: Money,
    volume: Units,
) -> BreakevenResult<Money> {
    let total_cm = mul(contribution_margin, volume, "profit at volume")?;
    sub(total_cm, fixed_costs, "profit at volume")
}

/// Scale `base` by `1 + pct`.
#[cfg(feature = "scenarios")]
pub(crate) fn scale_by_pct(base: Decimal, pct: Rate, context: &str) -> BreakevenResult<Decimal> {
    let factor = add(dec!(1), pct, context)?;
    mul(base, factor, context)
}

// ---------------------------------------------------------------------------
// Function 5: analyze
// ---------------------------------------------------------------------------

/// Break-even point, report, chart series and the optional extras in one
/// envelope. `on_invalid_margin` decides whether P <= V fails the whole
/// analysis or only drops the break-even-dependent figures.
pub fn analyze(input: &AnalysisInput) -> BreakevenResult<ComputationOutput<BreakevenAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let break_even = match compute(&input.base) {
        Ok(point) => Some(point),
        Err(e @ BreakevenError::InvalidMargin { .. }) => match input.on_invalid_margin {
            InvalidMarginPolicy::Suppress => return Err(e),
            InvalidMarginPolicy::Annotate => {
                tracing::debug!(error = %e, "rendering without break-even annotation");
                warnings.push(format!("{e}; report rendered without break-even figures"));
                None
            }
        },
        Err(e) => return Err(e),
    };

    let levels = input.levels.as_slice();
    let report = build_report(&input.base, levels)?;
    let series = build_series(&input.base, levels)?;

    let target_volume = match (break_even, input.target_profit) {
        (Some(point), Some(tp)) => Some(volume_for_profit(&input.base, &point, tp)?),
        _ => None,
    };

    let margin_of_safety = match (break_even, input.current_volume) {
        (Some(point), Some(volume)) => {
            Some(margin_of_safety(&input.base, &point, volume, &mut warnings)?)
        }
        _ => None,
    };

    #[cfg(feature = "scenarios")]
    let scenario_results = match &input.scenarios {
        Some(overrides) => overrides
            .iter()
            .map(|s| scenarios::evaluate(&input.base, input.current_volume, s))
            .collect::<BreakevenResult<Vec<ScenarioResult>>>()?,
        None => Vec::new(),
    };

    let output = BreakevenAnalysis {
        break_even,
        report,
        series,
        target_volume,
        margin_of_safety,
        #[cfg(feature = "scenarios")]
        scenario_results,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Cost-Volume-Profit Break-even Analysis",
        &serde_json::json!({
            "unit_price": input.base.unit_price.to_string(),
            "unit_variable_cost": input.base.unit_variable_cost.to_string(),
            "fixed_costs": input.base.fixed_costs.to_string(),
            "levels": input.levels.len(),
            "on_invalid_margin": input.on_invalid_margin,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
