//! Calculator session owned by one marketplace view
//!
//! A `PricingSession` holds the seller's current entries for one calculator and
//! recomputes the full result after every change. Two sessions never share state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculator::PriceCalculator;
use crate::error::{PricingError, Result};
use crate::fees::{FeeSchedule, Marketplace};
use crate::locale;
use crate::models::*;

/// Text fields accepted by [`PricingSession::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputField {
    BaseCost,
    TaxRate,
    VariableExpenses,
    /// Mercado Livre only
    CommissionRate,
    /// Mercado Livre only
    ShippingFee,
}

/// Outcome of leaving a field: normalized text to show plus the new result
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub text: String,
    pub result: PricingResult,
}

#[derive(Debug, Clone)]
pub struct PricingSession {
    calculator: PriceCalculator,
    /// Schedule restored by `reset`
    initial_schedule: FeeSchedule,
    input: PricingInput,
    next_extra_id: u32,
}

impl PricingSession {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self {
            calculator: PriceCalculator::new(schedule),
            initial_schedule: schedule,
            input: PricingInput::default(),
            next_extra_id: 1,
        }
    }

    pub fn marketplace(&self) -> Marketplace {
        self.calculator.schedule().marketplace()
    }

    pub fn schedule(&self) -> &FeeSchedule {
        self.calculator.schedule()
    }

    pub fn input(&self) -> &PricingInput {
        &self.input
    }

    /// Recompute the result for the current entries
    pub fn result(&self) -> PricingResult {
        self.calculator.calculate(&self.input)
    }

    pub fn margin_band(&self) -> MarginBand {
        MarginBand::from_percent(self.margin_percent())
    }

    pub fn margin_percent(&self) -> u8 {
        (self.input.desired_margin_rate * 100.0).round() as u8
    }

    /// Apply a keystroke-level edit to a text field
    pub fn update(&mut self, field: InputField, raw: &str) -> Result<PricingResult> {
        let marketplace = self.marketplace();
        match (field, self.calculator.schedule_mut()) {
            (InputField::BaseCost, _) => self.input.base_cost = locale::parse_amount(raw),
            (InputField::TaxRate, _) => self.input.tax_rate = locale::parse_percent(raw),
            (InputField::VariableExpenses, _) => {
                self.input.variable_expenses = locale::parse_amount(raw)
            }
            (InputField::CommissionRate, FeeSchedule::MercadoLivre(fees)) => {
                fees.commission_rate = locale::parse_percent(raw)
            }
            (InputField::ShippingFee, FeeSchedule::MercadoLivre(fees)) => {
                fees.shipping_fee = locale::parse_amount(raw)
            }
            (field, _) => return Err(PricingError::UnsupportedField { field, marketplace }),
        }
        debug!("{} field {:?} set from {:?}", marketplace, field, raw);
        Ok(self.result())
    }

    /// Apply the final value of a field when the seller leaves it
    pub fn commit(&mut self, field: InputField, raw: &str) -> Result<Committed> {
        let result = self.update(field, raw)?;
        let text = match field {
            InputField::TaxRate | InputField::CommissionRate => locale::clamp_percent_field(raw),
            _ => locale::format_field(raw),
        };
        Ok(Committed { text, result })
    }

    /// Margin slider, in whole percent
    pub fn set_margin_percent(&mut self, percent: u8) -> PricingResult {
        self.input.desired_margin_rate = percent.min(100) as f64 / 100.0;
        self.result()
    }

    pub fn set_free_shipping(&mut self, enabled: bool) -> Result<PricingResult> {
        if self.marketplace() != Marketplace::Shopee {
            return Err(PricingError::FreeShippingUnavailable(self.marketplace()));
        }
        self.input.free_shipping = enabled;
        Ok(self.result())
    }

    pub fn increment_multiplier(&mut self) -> PricingResult {
        self.input.cost_multiplier = self.input.cost_multiplier.saturating_add(1);
        self.result()
    }

    pub fn decrement_multiplier(&mut self) -> PricingResult {
        self.input.cost_multiplier = self.input.cost_multiplier.saturating_sub(1).max(1);
        self.result()
    }

    /// Append a flat extra cost of zero
    pub fn add_extra_cost(&mut self) -> (ExtraCostId, PricingResult) {
        let id = ExtraCostId(self.next_extra_id);
        self.next_extra_id += 1;
        self.input.extra_costs.push(ExtraCost::new(id));
        (id, self.result())
    }

    pub fn remove_extra_cost(&mut self, id: ExtraCostId) -> Result<PricingResult> {
        let index = self
            .input
            .extra_costs
            .iter()
            .position(|extra| extra.id == id)
            .ok_or(PricingError::UnknownExtraCost(id))?;
        self.input.extra_costs.remove(index);
        Ok(self.result())
    }

    pub fn set_extra_cost_amount(&mut self, id: ExtraCostId, raw: &str) -> Result<PricingResult> {
        self.extra_cost_mut(id)?.amount = locale::parse_amount(raw);
        Ok(self.result())
    }

    pub fn set_extra_cost_kind(
        &mut self,
        id: ExtraCostId,
        kind: ExtraCostKind,
    ) -> Result<PricingResult> {
        self.extra_cost_mut(id)?.kind = kind;
        Ok(self.result())
    }

    /// Clear every entry and restore the marketplace selections
    pub fn reset(&mut self) -> PricingResult {
        self.input = PricingInput::default();
        *self.calculator.schedule_mut() = self.initial_schedule;
        info!("{} calculator reset", self.marketplace());
        self.result()
    }

    fn extra_cost_mut(&mut self, id: ExtraCostId) -> Result<&mut ExtraCost> {
        self.input
            .extra_costs
            .iter_mut()
            .find(|extra| extra.id == id)
            .ok_or(PricingError::UnknownExtraCost(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_parses_comma_decimals() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        session.update(InputField::BaseCost, "19,90").unwrap();
        session.update(InputField::TaxRate, "6,5").unwrap();
        assert_eq!(session.input().base_cost, 19.9);
        assert!((session.input().tax_rate - 0.065).abs() < 1e-12);
    }

    #[test]
    fn test_tax_is_clamped_to_one_hundred_percent() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        let committed = session.commit(InputField::TaxRate, "180").unwrap();
        assert_eq!(committed.text, "100,00");
        assert_eq!(session.input().tax_rate, 1.0);
        assert!(!committed.result.is_feasible());
    }

    #[test]
    fn test_commit_formats_amounts() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        let committed = session.commit(InputField::VariableExpenses, "3,5").unwrap();
        assert_eq!(committed.text, "3,50");
        assert_eq!(session.input().variable_expenses, 3.5);
    }

    #[test]
    fn test_mercado_livre_fields_rejected_on_shopee() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        let err = session.update(InputField::CommissionRate, "12").unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnsupportedField {
                field: InputField::CommissionRate,
                marketplace: Marketplace::Shopee,
            }
        ));
    }

    #[test]
    fn test_free_shipping_rejected_on_mercado_livre() {
        let mut session = PricingSession::new(FeeSchedule::mercado_livre());
        assert!(matches!(
            session.set_free_shipping(false),
            Err(PricingError::FreeShippingUnavailable(Marketplace::MercadoLivre))
        ));
    }

    #[test]
    fn test_mercado_livre_selections() {
        let mut session = PricingSession::new(FeeSchedule::mercado_livre());
        session.update(InputField::CommissionRate, "12").unwrap();
        session.update(InputField::ShippingFee, "15,00").unwrap();
        assert_eq!(session.schedule().commission_rate(false), 0.12);
        assert_eq!(session.schedule().shipping_fee(), 15.0);
    }

    #[test]
    fn test_multiplier_never_drops_below_one() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        session.decrement_multiplier();
        assert_eq!(session.input().cost_multiplier, 1);
        session.increment_multiplier();
        session.increment_multiplier();
        assert_eq!(session.input().cost_multiplier, 3);
        session.decrement_multiplier();
        assert_eq!(session.input().cost_multiplier, 2);
    }

    #[test]
    fn test_margin_slider() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        session.set_margin_percent(35);
        assert_eq!(session.input().desired_margin_rate, 0.35);
        assert_eq!(session.margin_percent(), 35);
        assert_eq!(session.margin_band(), MarginBand::Lime);
        session.set_margin_percent(250);
        assert_eq!(session.input().desired_margin_rate, 1.0);
    }

    #[test]
    fn test_extra_cost_lifecycle() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        session.update(InputField::BaseCost, "20").unwrap();
        let (first, _) = session.add_extra_cost();
        let (second, _) = session.add_extra_cost();
        assert_ne!(first, second);
        assert_eq!(session.input().extra_costs[0].kind, ExtraCostKind::Flat);

        session.set_extra_cost_amount(first, "5").unwrap();
        session.set_extra_cost_amount(second, "10").unwrap();
        let result = session
            .set_extra_cost_kind(second, ExtraCostKind::Percent)
            .unwrap();
        assert_eq!(result.total_product_cost, 25.0);

        let result = session.remove_extra_cost(first).unwrap();
        assert_eq!(result.total_product_cost, 20.0);
        assert_eq!(session.input().extra_costs.len(), 1);

        assert!(matches!(
            session.remove_extra_cost(first),
            Err(PricingError::UnknownExtraCost(id)) if id == first
        ));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = PricingSession::new(FeeSchedule::mercado_livre());
        session.update(InputField::BaseCost, "50").unwrap();
        session.update(InputField::CommissionRate, "12").unwrap();
        session.set_margin_percent(25);
        session.increment_multiplier();
        session.add_extra_cost();

        let result = session.reset();
        assert_eq!(session.input(), &PricingInput::default());
        assert_eq!(session.schedule(), &FeeSchedule::mercado_livre());
        assert_eq!(result.sale_price, 0.0);
        assert_eq!(result.net_profit, 0.0);
    }

    #[test]
    fn test_shopee_reset_turns_free_shipping_back_on() {
        let mut session = PricingSession::new(FeeSchedule::shopee());
        session.set_free_shipping(false).unwrap();
        session.reset();
        assert!(session.input().free_shipping);
    }
}
