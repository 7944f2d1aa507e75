use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::{compute, profit_at, scale_by_pct};
use crate::types::{BreakevenInput, Money, Rate, Units};
use crate::BreakevenResult;

/// A what-if adjustment to the base inputs. Changes are fractional:
/// 0.10 raises the figure by 10%, -0.05 lowers it by 5%.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOverride {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_cost_change_pct: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_cost_change_pct: Option<Rate>,
}

/// Result for a single what-if scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub unit_price: Money,
    pub unit_variable_cost: Money,
    pub fixed_costs: Money,
    pub breakeven_units: Units,
    pub breakeven_revenue: Money,
    /// Present only when a current volume was supplied
    pub profit_at_current_volume: Option<Money>,
}

/// Apply the overrides to `base` and recompute the break-even point.
pub fn evaluate(
    base: &BreakevenInput,
    current_volume: Option<Units>,
    overrides: &ScenarioOverride,
) -> BreakevenResult<ScenarioResult> {
    let adjusted = BreakevenInput::new(
        apply_pct_change(base.unit_price, overrides.price_change_pct)?,
        apply_pct_change(base.unit_variable_cost, overrides.variable_cost_change_pct)?,
        apply_pct_change(base.fixed_costs, overrides.fixed_cost_change_pct)?,
    );

    let point = compute(&adjusted).inspect_err(|_| {
        tracing::debug!(scenario = %overrides.name, "scenario has no positive contribution margin");
    })?;

    let profit_at_current_volume = current_volume
        .map(|v| profit_at(point.contribution_margin, adjusted.fixed_costs, v))
        .transpose()?;

    Ok(ScenarioResult {
        name: overrides.name.clone(),
        unit_price: adjusted.unit_price,
        unit_variable_cost: adjusted.unit_variable_cost,
        fixed_costs: adjusted.fixed_costs,
        breakeven_units: point.units,
        breakeven_revenue: point.revenue,
        profit_at_current_volume,
    })
}

/// Apply an optional percentage change to a base value.
/// e.g. base=100, change=Some(0.10) => 110
fn apply_pct_change(base: Decimal, change_pct: Option<Rate>) -> BreakevenResult<Decimal> {
    match change_pct {
        Some(pct) => scale_by_pct(base, pct, "scenario adjustment"),
        None => Ok(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BreakevenError;
    use rust_decimal_macros::dec;

    fn base() -> BreakevenInput {
        BreakevenInput::new(dec!(50), dec!(30), dec!(10000))
    }

    fn scenario(name: &str) -> ScenarioOverride {
        ScenarioOverride {
            name: name.to_string(),
            price_change_pct: None,
            variable_cost_change_pct: None,
            fixed_cost_change_pct: None,
        }
    }

    #[test]
    fn test_price_increase_lowers_breakeven() {
        let mut s = scenario("Price +10%");
        s.price_change_pct = Some(dec!(0.10));
        let result = evaluate(&base(), None, &s).unwrap();
        // new_price = 55, CM = 25, BE = 10000/25 = 400 < 500
        assert_eq!(result.breakeven_units, dec!(400));
        assert_eq!(result.unit_price, dec!(55));
        assert!(result.profit_at_current_volume.is_none());
    }

    #[test]
    fn test_cost_increase_raises_breakeven() {
        let mut s = scenario("VC +25%");
        s.variable_cost_change_pct = Some(dec!(0.25));
        let result = evaluate(&base(), Some(dec!(1000)), &s).unwrap();
        // new_vc = 37.5, CM = 12.5, BE = 800; profit = 12.5*1000 - 10000 = 2500
        assert_eq!(result.breakeven_units, dec!(800));
        assert_eq!(result.profit_at_current_volume, Some(dec!(2500)));
    }

    #[test]
    fn test_fixed_cost_change() {
        let mut s = scenario("FC +50%");
        s.fixed_cost_change_pct = Some(dec!(0.50));
        let result = evaluate(&base(), None, &s).unwrap();
        // new_fc = 15000, BE = 15000/20 = 750
        assert_eq!(result.breakeven_units, dec!(750));
    }

    #[test]
    fn test_scenario_wiping_out_margin_fails() {
        let mut s = scenario("Price -40%");
        s.price_change_pct = Some(dec!(-0.40));
        // new_price = 30 == vc
        assert!(matches!(
            evaluate(&base(), None, &s),
            Err(BreakevenError::InvalidMargin { .. })
        ));
    }

    #[test]
    fn test_scenario_overflow_is_error() {
        let mut s = scenario("Fixed costs unbounded");
        s.fixed_cost_change_pct = Some(Decimal::MAX);
        assert!(matches!(
            evaluate(&base(), None, &s),
            Err(BreakevenError::Overflow { .. })
        ));
    }
}
