use colored::*;
use std::fmt;

use pricing_engine::locale::{format_currency, format_multiplier, format_percent};
use pricing_engine::{ExtraCostKind, MarginBand, PricingResult, PricingSession, ProfitTone};

pub fn profit_colored(result: &PricingResult) -> ColoredString {
    let text = format_currency(result.net_profit);
    match result.profit_tone() {
        ProfitTone::Positive => text.green().bold(),
        ProfitTone::Negative => text.red().bold(),
        ProfitTone::Neutral => text.blue().bold(),
    }
}

pub fn margin_colored(percent: u8) -> ColoredString {
    let text = format!("{}%", percent);
    match MarginBand::from_percent(percent) {
        MarginBand::Red => text.red(),
        MarginBand::Orange => text.truecolor(255, 140, 0),
        MarginBand::Yellow => text.yellow(),
        MarginBand::Lime => text.truecolor(160, 220, 40),
        MarginBand::LightGreen => text.bright_green(),
        MarginBand::Cyan => text.cyan(),
        MarginBand::DarkBlue => text.blue(),
    }
}

/// Result table lines, without colour codes in the labels
pub fn result_lines(result: &PricingResult) -> Vec<(&'static str, String)> {
    vec![
        ("Sale price", format_currency(result.sale_price)),
        ("Net profit", format_currency(result.net_profit)),
        ("Platform fees", format_currency(result.platform_fee_total)),
        ("Taxes", format_currency(result.tax_amount)),
        ("Percent extras", format_currency(result.extra_percent_amount)),
        ("Total cost", format_currency(result.total_product_cost)),
        ("Return on cost", format_percent(result.return_on_cost_pct)),
        ("Markup", format_percent(result.markup_pct)),
        ("Markup multiplier", format_multiplier(result.markup_multiplier)),
    ]
}

fn print_row(label: &str, value: impl fmt::Display) {
    println!("  {:<18} {}", label, value);
}

pub fn print_result(session: &PricingSession, result: &PricingResult) {
    println!();
    let title = format!("═══ {} ═══", session.marketplace());
    println!("{}", title.cyan().bold());
    for (label, value) in result_lines(result) {
        match label {
            "Net profit" => print_row(label, profit_colored(result)),
            "Sale price" => print_row(label, value.bold()),
            _ => print_row(label, value),
        }
    }
    print_row("Margin", margin_colored(session.margin_percent()));

    if !result.is_feasible() {
        println!(
            "  {}",
            format!(
                "⚠ No feasible price: percentage deductions take {} of the sale price",
                format_percent((1.0 - result.denominator) * 100.0)
            )
            .yellow()
        );
    }
}

pub fn print_inputs(session: &PricingSession) {
    let input = session.input();
    let schedule = session.schedule();
    let cost = format_currency(input.base_cost);
    let expenses = format_currency(input.variable_expenses);
    let commission = schedule.commission_rate(input.free_shipping) * 100.0;

    println!();
    println!("{}", "Inputs".bold());
    print_row("Cost", format!("{} x{}", cost, input.cost_multiplier));
    print_row("Tax", format_percent(input.tax_rate * 100.0));
    print_row("Variable expenses", expenses);
    print_row("Commission", format_percent(commission));

    let fixed_fee = schedule.fixed_fee_per_item();
    if fixed_fee > 0.0 {
        print_row("Fee per item", format_currency(fixed_fee));
    }
    let shipping_fee = schedule.shipping_fee();
    if shipping_fee > 0.0 {
        print_row("Shipping", format_currency(shipping_fee));
    }
    for extra in &input.extra_costs {
        let value = match extra.kind {
            ExtraCostKind::Flat => format_currency(extra.amount),
            ExtraCostKind::Percent => format_percent(extra.amount),
        };
        print_row(&format!("Extra {}", extra.id), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricing_engine::{price, FeeSchedule, PricingInput};

    #[test]
    fn test_result_lines_use_locale_formats() {
        let input = PricingInput {
            base_cost: 20.0,
            desired_margin_rate: 0.20,
            free_shipping: false,
            ..Default::default()
        };
        let result = price(&FeeSchedule::shopee(), &input);
        let lines = result_lines(&result);
        assert_eq!(lines[0], ("Sale price", "R$ 36,36".to_string()));
        assert_eq!(lines[8], ("Markup multiplier", "1.82X".to_string()));
    }
}
