//! Display formatting for the break-even figures and the production report.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::analysis::{BreakevenPoint, ReportRow, RowBand};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "Q";

/// Decimal places for every displayed figure.
pub const DISPLAY_DECIMALS: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub currency_symbol: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

fn fixed(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    // -0.004 rounds to a signed zero
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.*}", DISPLAY_DECIMALS as usize, rounded)
}

/// "2000.00"
pub fn format_units(units: Decimal) -> String {
    fixed(units)
}

/// "Q20000.00"; negatives keep the symbol first: "Q-500.00"
pub fn format_money(amount: Decimal, currency_symbol: &str) -> String {
    format!("{}{}", currency_symbol, fixed(amount))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub band: RowBand,
    pub cells: [String; 6],
}

/// The report as display strings: the two break-even scalars, six column
/// headers and one banded row per production level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSheet {
    pub break_even_units: Option<String>,
    pub break_even_revenue: Option<String>,
    pub headers: [String; 6],
    pub rows: Vec<SheetRow>,
}

impl ReportSheet {
    pub fn new(point: Option<&BreakevenPoint>, rows: &[ReportRow], options: &DisplayOptions) -> Self {
        let sym = options.currency_symbol.as_str();
        let money_header = |name: &str| format!("{name} ({sym})");

        Self {
            break_even_units: point.map(|p| format_units(p.units)),
            break_even_revenue: point.map(|p| format_money(p.revenue, sym)),
            headers: [
                "Units".to_string(),
                money_header("Revenue"),
                money_header("Variable Cost"),
                money_header("Contribution Margin"),
                money_header("Fixed Cost"),
                money_header("Profit/Loss"),
            ],
            rows: rows
                .iter()
                .map(|r| SheetRow {
                    band: r.band,
                    cells: [
                        r.units.normalize().to_string(),
                        format_money(r.revenue, sym),
                        format_money(r.variable_cost, sym),
                        format_money(r.contribution_margin, sym),
                        format_money(r.fixed_cost, sym),
                        format_money(r.profit_loss, sym),
                    ],
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{build_report, compute};
    use crate::levels::DEFAULT_LEVELS;
    use crate::types::BreakevenInput;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_units_two_places() {
        assert_eq!(format_units(dec!(2000)), "2000.00");
        assert_eq!(format_units(dec!(1666.666666)), "1666.67");
        assert_eq!(format_units(dec!(0.005)), "0.01");
    }

    #[test]
    fn test_format_money_prefix() {
        assert_eq!(format_money(dec!(20000), "Q"), "Q20000.00");
        assert_eq!(format_money(dec!(-500), "Q"), "Q-500.00");
        assert_eq!(format_money(dec!(12.5), "$"), "$12.50");
    }

    #[test]
    fn test_format_money_no_negative_zero() {
        assert_eq!(format_money(dec!(-0.001), "Q"), "Q0.00");
    }

    #[test]
    fn test_sheet_known_answer() {
        let input = BreakevenInput::new(dec!(10), dec!(6), dec!(8000));
        let point = compute(&input).unwrap();
        let rows = build_report(&input, &DEFAULT_LEVELS).unwrap();
        let sheet = ReportSheet::new(Some(&point), &rows, &DisplayOptions::default());

        assert_eq!(sheet.break_even_units.as_deref(), Some("2000.00"));
        assert_eq!(sheet.break_even_revenue.as_deref(), Some("Q20000.00"));
        assert_eq!(sheet.headers[1], "Revenue (Q)");
        assert_eq!(
            sheet.rows[2].cells,
            [
                "5000".to_string(),
                "Q50000.00".to_string(),
                "Q30000.00".to_string(),
                "Q20000.00".to_string(),
                "Q8000.00".to_string(),
                "Q12000.00".to_string(),
            ]
        );
        assert_eq!(sheet.rows[1].band, RowBand::Odd);
    }

    #[test]
    fn test_sheet_without_break_even() {
        let input = BreakevenInput::new(dec!(5), dec!(5), dec!(1000));
        let rows = build_report(&input, &DEFAULT_LEVELS).unwrap();
        let sheet = ReportSheet::new(None, &rows, &DisplayOptions::default());
        assert!(sheet.break_even_units.is_none());
        assert_eq!(sheet.rows.len(), 5);
        assert_eq!(sheet.rows[0].cells[5], "Q-1000.00");
    }
}
