use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BreakevenError;
use crate::BreakevenResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Production or sales quantities. Fractional at the break-even point.
pub type Units = Decimal;

/// Ratios expressed as decimals (0.4 = 40%). Never as percentages.
pub type Rate = Decimal;

/// The three figures every break-even calculation starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakevenInput {
    /// Sales price per unit
    pub unit_price: Money,
    /// Variable cost per unit
    pub unit_variable_cost: Money,
    /// Fixed costs for the analysed period
    pub fixed_costs: Money,
}

impl BreakevenInput {
    pub fn new(unit_price: Money, unit_variable_cost: Money, fixed_costs: Money) -> Self {
        Self {
            unit_price,
            unit_variable_cost,
            fixed_costs,
        }
    }

    /// Price minus variable cost. May be zero or negative.
    pub fn unit_contribution_margin(&self) -> BreakevenResult<Money> {
        self.unit_price
            .checked_sub(self.unit_variable_cost)
            .ok_or_else(|| BreakevenError::overflow("contribution margin"))
    }
}

/// What to do with the report and chart when price does not exceed
/// variable cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidMarginPolicy {
    /// Produce the report and chart from the raw inputs, without a
    /// break-even annotation, and attach a warning.
    #[default]
    Annotate,
    /// Fail the whole analysis with `InvalidMargin`.
    Suppress,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
