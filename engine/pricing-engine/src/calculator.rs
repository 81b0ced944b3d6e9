use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::fees::FeeSchedule;
use crate::models::*;

/// Decimal places a rate keeps when the deductions are summed
const RATE_SCALE: u32 = 12;

/// Reverse price calculator for one marketplace fee schedule.
///
/// Solves for the sale price at which the seller keeps `desired_margin_rate` of
/// the price after commission, taxes and percentage extra costs:
///
/// ```text
///                total_cost + variable_expenses + fixed_fee
/// price = ----------------------------------------------------------
///         1 - commission - other_fees - margin - tax - extra_pct
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator {
    schedule: FeeSchedule,
}

impl PriceCalculator {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut FeeSchedule {
        &mut self.schedule
    }

    /// Fraction of the price left once every percentage deduction is taken out.
    /// The configuration is infeasible when this is not positive.
    ///
    /// Deductions adding up to exactly 100% give exactly zero.
    pub fn denominator(&self, input: &PricingInput) -> f64 {
        match self.exact_denominator(input).and_then(|d| d.to_f64()) {
            Some(denominator) => denominator,
            None => {
                let (_, extra_pct_rate) = input.extra_cost_totals();
                1.0 - self.schedule.commission_rate(input.free_shipping)
                    - self.schedule.other_percent_fee_rate()
                    - input.desired_margin_rate
                    - input.tax_rate
                    - extra_pct_rate
            }
        }
    }

    /// Sum the deductions in decimal. `None` when a term does not fit a `Decimal`.
    fn exact_denominator(&self, input: &PricingInput) -> Option<Decimal> {
        let rates = [
            self.schedule.commission_rate(input.free_shipping),
            self.schedule.other_percent_fee_rate(),
            input.desired_margin_rate,
            input.tax_rate,
        ];

        let mut denominator = Decimal::ONE;
        for rate in rates {
            denominator = denominator.checked_sub(exact_rate(rate)?)?;
        }
        for extra in &input.extra_costs {
            if extra.kind == ExtraCostKind::Percent {
                let rate = exact_rate(extra.amount)? / Decimal::from(100);
                denominator = denominator.checked_sub(rate)?;
            }
        }
        Some(denominator)
    }

    /// Calculate the sale price and every figure derived from it
    pub fn calculate(&self, input: &PricingInput) -> PricingResult {
        let (extra_flat, extra_pct_rate) = input.extra_cost_totals();
        let total_product_cost = input.product_cost() + extra_flat;
        let commission_rate = self.schedule.commission_rate(input.free_shipping);
        let percent_fee_rate = commission_rate + self.schedule.other_percent_fee_rate();
        let fixed_fee = self.schedule.fixed_fee_per_item();

        let denominator = self.denominator(input);
        if denominator <= 0.0 {
            if total_product_cost > 0.0 {
                warn!(
                    "No feasible {} price: deductions reach {:.2}% of the sale price",
                    self.schedule.marketplace(),
                    (1.0 - denominator) * 100.0
                );
            }
            return PricingResult::infeasible(denominator);
        }

        let sale_price = (total_product_cost + input.variable_expenses + fixed_fee) / denominator;

        let tax_amount = sale_price * input.tax_rate;
        let extra_percent_amount = sale_price * extra_pct_rate;
        let platform_fee_total =
            sale_price * percent_fee_rate + fixed_fee + self.schedule.shipping_fee();

        let net_profit = sale_price
            - total_product_cost
            - input.variable_expenses
            - platform_fee_total
            - tax_amount
            - extra_percent_amount;

        let (return_on_cost_pct, markup_pct, markup_multiplier) = if total_product_cost > 0.0 {
            (
                net_profit / total_product_cost * 100.0,
                (sale_price - total_product_cost) / total_product_cost * 100.0,
                sale_price / total_product_cost,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        debug!(
            "Calculated {} price {:.4} (denominator: {:.4}, net profit: {:.4})",
            self.schedule.marketplace(),
            sale_price,
            denominator,
            net_profit
        );

        PricingResult {
            sale_price,
            net_profit,
            platform_fee_total,
            tax_amount,
            extra_percent_amount,
            total_product_cost,
            return_on_cost_pct,
            markup_pct,
            markup_multiplier,
            denominator,
            feasibility: Feasibility::Feasible,
        }
    }
}

fn exact_rate(rate: f64) -> Option<Decimal> {
    Decimal::from_f64(rate).map(|rate| rate.round_dp(RATE_SCALE))
}

/// Price `input` under `schedule`
pub fn price(schedule: &FeeSchedule, input: &PricingInput) -> PricingResult {
    PriceCalculator::new(*schedule).calculate(input)
}
