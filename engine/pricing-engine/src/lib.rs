//! # Pricing Engine
//!
//! Reverse pricing for marketplace sellers: given product cost, taxes, a desired
//! margin and the marketplace fees, find the sale price at which the seller keeps
//! exactly that margin, and derive profit, fee and markup figures from it.
//!
//! Shopee and Mercado Livre share the same formula and differ only in which fee
//! terms take part. Results are recomputed from scratch on every change.

pub mod calculator;
pub mod config;
pub mod error;
pub mod fees;
pub mod locale;
pub mod models;
pub mod session;


pub use crate::calculator::{price, PriceCalculator};
pub use crate::config::{LoggingConfig, PricingConfig};
pub use crate::error::{PricingError, Result};
pub use crate::fees::{FeeSchedule, Marketplace, MercadoLivreFees, ShopeeFees};
pub use crate::models::*;
pub use crate::session::{Committed, InputField, PricingSession};

/// Current version of the pricing engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
