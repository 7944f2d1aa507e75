pub mod analysis;
pub mod chart;
pub mod error;
pub mod handlers;
pub mod levels;
pub mod presentation;
pub mod types;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::BreakevenError;
pub use types::*;

/// Standard result type for all break-even operations
pub type BreakevenResult<T> = Result<T, BreakevenError>;
