//! Marketplace fee schedules

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PricingError, Result};

/// Shopee standard commission (14%)
pub const SHOPEE_COMMISSION_STANDARD: f64 = 0.14;

/// Shopee commission when enrolled in the free shipping programme (20%)
pub const SHOPEE_COMMISSION_FREE_SHIPPING: f64 = 0.20;

/// Shopee transaction fee rate
pub const SHOPEE_TRANSACTION_RATE: f64 = 0.0;

/// Shopee fixed fee charged per item sold (R$4,00)
pub const SHOPEE_FIXED_FEE_PER_ITEM: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marketplace {
    Shopee,
    MercadoLivre,
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marketplace::Shopee => write!(f, "Shopee"),
            Marketplace::MercadoLivre => write!(f, "Mercado Livre"),
        }
    }
}

/// Shopee fees: the free shipping toggle switches the commission rate, and a flat
/// fee is charged on every item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopeeFees {
    pub commission_standard: f64,
    pub commission_free_shipping: f64,
    pub transaction_rate: f64,
    pub fixed_fee_per_item: f64,
}

impl Default for ShopeeFees {
    fn default() -> Self {
        Self {
            commission_standard: SHOPEE_COMMISSION_STANDARD,
            commission_free_shipping: SHOPEE_COMMISSION_FREE_SHIPPING,
            transaction_rate: SHOPEE_TRANSACTION_RATE,
            fixed_fee_per_item: SHOPEE_FIXED_FEE_PER_ITEM,
        }
    }
}

/// Mercado Livre fees: both values are picked by the seller per listing.
///
/// Shipping is a flat currency amount charged on top of the commission; it does
/// not take part in the reverse-pricing denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MercadoLivreFees {
    pub commission_rate: f64,
    pub shipping_fee: f64,
}

/// Fee schedule for one marketplace variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "marketplace", rename_all = "kebab-case")]
pub enum FeeSchedule {
    Shopee(ShopeeFees),
    MercadoLivre(MercadoLivreFees),
}

impl FeeSchedule {
    pub fn shopee() -> Self {
        FeeSchedule::Shopee(ShopeeFees::default())
    }

    pub fn mercado_livre() -> Self {
        FeeSchedule::MercadoLivre(MercadoLivreFees::default())
    }

    pub fn marketplace(&self) -> Marketplace {
        match self {
            FeeSchedule::Shopee(_) => Marketplace::Shopee,
            FeeSchedule::MercadoLivre(_) => Marketplace::MercadoLivre,
        }
    }

    /// Commission rate applied to the sale price
    pub fn commission_rate(&self, free_shipping: bool) -> f64 {
        match self {
            FeeSchedule::Shopee(fees) if free_shipping => fees.commission_free_shipping,
            FeeSchedule::Shopee(fees) => fees.commission_standard,
            FeeSchedule::MercadoLivre(fees) => fees.commission_rate,
        }
    }

    /// Percentage fees charged on the sale price besides the commission
    pub fn other_percent_fee_rate(&self) -> f64 {
        match self {
            FeeSchedule::Shopee(fees) => fees.transaction_rate,
            FeeSchedule::MercadoLivre(_) => 0.0,
        }
    }

    /// Flat fee added to the numerator of the pricing formula
    pub fn fixed_fee_per_item(&self) -> f64 {
        match self {
            FeeSchedule::Shopee(fees) => fees.fixed_fee_per_item,
            FeeSchedule::MercadoLivre(_) => 0.0,
        }
    }

    /// Flat shipping amount deducted from profit
    pub fn shipping_fee(&self) -> f64 {
        match self {
            FeeSchedule::Shopee(_) => 0.0,
            FeeSchedule::MercadoLivre(fees) => fees.shipping_fee,
        }
    }

    /// Check that every rate is a fraction in [0, 1] and every amount is non-negative
    pub fn validate(&self) -> Result<()> {
        match self {
            FeeSchedule::Shopee(fees) => {
                check_rate("shopee.commission_standard", fees.commission_standard)?;
                check_rate(
                    "shopee.commission_free_shipping",
                    fees.commission_free_shipping,
                )?;
                check_rate("shopee.transaction_rate", fees.transaction_rate)?;
                check_amount("shopee.fixed_fee_per_item", fees.fixed_fee_per_item)
            }
            FeeSchedule::MercadoLivre(fees) => {
                check_rate("mercado_livre.commission_rate", fees.commission_rate)?;
                check_amount("mercado_livre.shipping_fee", fees.shipping_fee)
            }
        }
    }
}

fn check_rate(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PricingError::InvalidFeeSchedule(format!(
            "{name} must be a fraction between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

fn check_amount(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PricingError::InvalidFeeSchedule(format!(
            "{name} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}
