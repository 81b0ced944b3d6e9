use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle for an extra cost line inside one pricing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtraCostId(pub u32);

impl fmt::Display for ExtraCostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How an extra cost amount is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraCostKind {
    /// Currency amount added to the product cost
    #[default]
    Flat,
    /// Percentage of the final sale price (entered as 0..100)
    Percent,
}

/// Additional fee line entered by the seller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtraCost {
    pub id: ExtraCostId,
    pub amount: f64,
    pub kind: ExtraCostKind,
}

impl ExtraCost {
    pub fn new(id: ExtraCostId) -> Self {
        Self {
            id,
            amount: 0.0,
            kind: ExtraCostKind::Flat,
        }
    }
}

/// Canonical pricing request. Rates are fractions, amounts are currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub base_cost: f64,
    pub cost_multiplier: u32,
    pub tax_rate: f64,
    pub variable_expenses: f64,
    pub desired_margin_rate: f64,
    pub free_shipping: bool,
    pub extra_costs: Vec<ExtraCost>,
}

impl Default for PricingInput {
    fn default() -> Self {
        Self {
            base_cost: 0.0,
            cost_multiplier: 1,
            tax_rate: 0.0,
            variable_expenses: 0.0,
            desired_margin_rate: 0.0,
            free_shipping: true,
            extra_costs: Vec::new(),
        }
    }
}

impl PricingInput {
    /// Sum of flat extra costs and sum of percentage extra costs as a fraction.
    pub fn extra_cost_totals(&self) -> (f64, f64) {
        self.extra_costs
            .iter()
            .fold((0.0, 0.0), |(flat, pct), extra| match extra.kind {
                ExtraCostKind::Flat => (flat + extra.amount, pct),
                ExtraCostKind::Percent => (flat, pct + extra.amount / 100.0),
            })
    }

    pub fn product_cost(&self) -> f64 {
        self.base_cost * self.cost_multiplier as f64
    }
}

/// Whether a finite sale price satisfies the margin target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feasibility {
    Feasible,
    /// Percentage deductions reach or exceed 100% of the price
    Infeasible,
}

/// Derived figures for the current input. Recomputed on every change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub sale_price: f64,
    pub net_profit: f64,
    pub platform_fee_total: f64,
    pub tax_amount: f64,
    pub extra_percent_amount: f64,
    pub total_product_cost: f64,
    pub return_on_cost_pct: f64,
    pub markup_pct: f64,
    pub markup_multiplier: f64,
    pub denominator: f64,
    pub feasibility: Feasibility,
}

impl PricingResult {
    /// Degenerate result for a configuration with no valid price
    pub fn infeasible(denominator: f64) -> Self {
        Self {
            sale_price: 0.0,
            net_profit: 0.0,
            platform_fee_total: 0.0,
            tax_amount: 0.0,
            extra_percent_amount: 0.0,
            total_product_cost: 0.0,
            return_on_cost_pct: 0.0,
            markup_pct: 0.0,
            markup_multiplier: 0.0,
            denominator,
            feasibility: Feasibility::Infeasible,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.feasibility == Feasibility::Feasible
    }

    pub fn profit_tone(&self) -> ProfitTone {
        ProfitTone::from_profit(self.net_profit)
    }
}

/// Sign of the net profit, used by front-ends to pick the success/danger/neutral colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfitTone {
    Positive,
    Negative,
    Neutral,
}

impl ProfitTone {
    pub fn from_profit(net_profit: f64) -> Self {
        if net_profit > 0.0 {
            ProfitTone::Positive
        } else if net_profit < 0.0 {
            ProfitTone::Negative
        } else {
            ProfitTone::Neutral
        }
    }
}

/// Colour band of the margin slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarginBand {
    Red,
    Orange,
    Yellow,
    Lime,
    LightGreen,
    Cyan,
    DarkBlue,
}

impl MarginBand {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=10 => MarginBand::Red,
            11..=20 => MarginBand::Orange,
            21..=30 => MarginBand::Yellow,
            31..=40 => MarginBand::Lime,
            41..=50 => MarginBand::LightGreen,
            51..=60 => MarginBand::Cyan,
            _ => MarginBand::DarkBlue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(id: u32, amount: f64, kind: ExtraCostKind) -> ExtraCost {
        ExtraCost {
            id: ExtraCostId(id),
            amount,
            kind,
        }
    }

    #[test]
    fn test_extra_cost_totals_partition_by_kind() {
        let input = PricingInput {
            extra_costs: vec![
                extra(1, 5.0, ExtraCostKind::Flat),
                extra(2, 3.0, ExtraCostKind::Percent),
                extra(3, 2.5, ExtraCostKind::Flat),
                extra(4, 7.0, ExtraCostKind::Percent),
            ],
            ..Default::default()
        };
        let (flat, pct) = input.extra_cost_totals();
        assert_eq!(flat, 7.5);
        assert!((pct - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_new_extra_cost_defaults_to_flat_zero() {
        let cost = ExtraCost::new(ExtraCostId(9));
        assert_eq!(cost.kind, ExtraCostKind::Flat);
        assert_eq!(cost.amount, 0.0);
    }

    #[test]
    fn test_product_cost_applies_multiplier() {
        let input = PricingInput {
            base_cost: 12.5,
            cost_multiplier: 3,
            ..Default::default()
        };
        assert_eq!(input.product_cost(), 37.5);
    }

    #[test]
    fn test_profit_tone() {
        assert_eq!(ProfitTone::from_profit(0.01), ProfitTone::Positive);
        assert_eq!(ProfitTone::from_profit(-0.01), ProfitTone::Negative);
        assert_eq!(ProfitTone::from_profit(0.0), ProfitTone::Neutral);
    }

    #[test]
    fn test_margin_band_edges() {
        assert_eq!(MarginBand::from_percent(0), MarginBand::Red);
        assert_eq!(MarginBand::from_percent(10), MarginBand::Red);
        assert_eq!(MarginBand::from_percent(11), MarginBand::Orange);
        assert_eq!(MarginBand::from_percent(30), MarginBand::Yellow);
        assert_eq!(MarginBand::from_percent(40), MarginBand::Lime);
        assert_eq!(MarginBand::from_percent(50), MarginBand::LightGreen);
        assert_eq!(MarginBand::from_percent(60), MarginBand::Cyan);
        assert_eq!(MarginBand::from_percent(61), MarginBand::DarkBlue);
        assert_eq!(MarginBand::from_percent(100), MarginBand::DarkBlue);
    }
}
