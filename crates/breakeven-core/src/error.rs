use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BreakevenError {
    #[error("Invalid number in {field}: '{input}' is not a valid number")]
    Parse { field: String, input: String },

    #[error(
        "Unit price ({price}) must be greater than unit variable cost ({variable_cost}); \
         no break-even point exists"
    )]
    InvalidMargin {
        price: Decimal,
        variable_cost: Decimal,
    },

    #[error("Arithmetic overflow in {context}: the result is too large to represent")]
    Overflow { context: String },
}

impl BreakevenError {
    pub fn parse(field: &str, input: &str) -> Self {
        BreakevenError::Parse {
            field: field.to_string(),
            input: input.to_string(),
        }
    }

    pub fn overflow(context: &str) -> Self {
        BreakevenError::Overflow {
            context: context.to_string(),
        }
    }
}
