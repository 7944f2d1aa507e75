use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Units;

/// Production quantities shown in the report when nothing else is configured.
pub const DEFAULT_LEVELS: [Decimal; 5] = [dec!(3000), dec!(4000), dec!(5000), dec!(6000), dec!(7000)];

/// Units added on each side of the level domain on the chart's x axis.
pub const AXIS_PADDING_UNITS: Decimal = dec!(1000);

/// Ordered production quantities for the report and the chart domain.
///
/// Order is preserved as given; the report lists rows in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Units>", into = "Vec<Units>")]
pub struct ProductionLevels(Vec<Units>);

impl ProductionLevels {
    /// Returns `None` for an empty list.
    pub fn new(levels: Vec<Units>) -> Option<Self> {
        if levels.is_empty() {
            None
        } else {
            Some(Self(levels))
        }
    }

    pub fn as_slice(&self) -> &[Units] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min(&self) -> Units {
        self.0.iter().copied().min().unwrap_or(Decimal::ZERO)
    }

    pub fn max(&self) -> Units {
        self.0.iter().copied().max().unwrap_or(Decimal::ZERO)
    }

    /// Chart x-axis range: the level domain padded by [`AXIS_PADDING_UNITS`],
    /// clamped to the representable range.
    pub fn padded_range(&self) -> (Units, Units) {
        (
            self.min().saturating_sub(AXIS_PADDING_UNITS),
            self.max().saturating_add(AXIS_PADDING_UNITS),
        )
    }
}

impl Default for ProductionLevels {
    fn default() -> Self {
        Self(DEFAULT_LEVELS.to_vec())
    }
}

impl TryFrom<Vec<Units>> for ProductionLevels {
    type Error = String;

    fn try_from(levels: Vec<Units>) -> Result<Self, Self::Error> {
        Self::new(levels).ok_or_else(|| "production levels must not be empty".to_string())
    }
}

impl From<ProductionLevels> for Vec<Units> {
    fn from(levels: ProductionLevels) -> Self {
        levels.0
    }
}

impl AsRef<[Units]> for ProductionLevels {
    fn as_ref(&self) -> &[Units] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels() {
        let levels = ProductionLevels::default();
        assert_eq!(levels.len(), 5);
        assert_eq!(levels.as_slice()[0], dec!(3000));
        assert_eq!(levels.as_slice()[4], dec!(7000));
    }

    #[test]
    fn test_empty_levels_rejected() {
        assert!(ProductionLevels::new(vec![]).is_none());
        assert!(serde_json::from_str::<ProductionLevels>("[]").is_err());
    }

    #[test]
    fn test_levels_deserialize_from_json_array() {
        let levels: ProductionLevels = serde_json::from_str(r#"[100, "250.5"]"#).unwrap();
        assert_eq!(levels.as_slice(), &[dec!(100), dec!(250.5)]);
    }

    #[test]
    fn test_padded_range_default() {
        assert_eq!(
            ProductionLevels::default().padded_range(),
            (dec!(2000), dec!(8000))
        );
    }

    #[test]
    fn test_padded_range_unordered_levels() {
        let levels = ProductionLevels::new(vec![dec!(500), dec!(100), dec!(300)]).unwrap();
        assert_eq!(levels.as_slice(), &[dec!(500), dec!(100), dec!(300)]);
        assert_eq!(levels.padded_range(), (dec!(-900), dec!(1500)));
    }

    #[test]
    fn test_padded_range_saturates() {
        let levels = ProductionLevels::new(vec![Decimal::MIN, Decimal::MAX]).unwrap();
        assert_eq!(levels.padded_range(), (Decimal::MIN, Decimal::MAX));
    }
}
