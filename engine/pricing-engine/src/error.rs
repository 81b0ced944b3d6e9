//! Error types for the pricing engine

use thiserror::Error;

use crate::fees::Marketplace;
use crate::models::ExtraCostId;
use crate::session::InputField;

/// Result type for pricing engine operations
pub type Result<T> = std::result::Result<T, PricingError>;

/// Errors that can occur while driving a pricing session or loading its configuration.
///
/// Malformed numbers and infeasible fee combinations are not errors: they resolve to
/// zero inputs and a degenerate result respectively.
#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Extra cost not found: {0}")]
    UnknownExtraCost(ExtraCostId),

    #[error("Field {field:?} is not available for {marketplace}")]
    UnsupportedField {
        field: InputField,
        marketplace: Marketplace,
    },

    #[error("Free shipping toggle is not available for {0}")]
    FreeShippingUnavailable(Marketplace),

    #[error("Invalid fee schedule: {0}")]
    InvalidFeeSchedule(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
