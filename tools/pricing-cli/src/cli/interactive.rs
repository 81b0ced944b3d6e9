use anyhow::{Context, Result};
use colored::*;
use std::io::{self, BufRead, Write};
use tracing::warn;

use pricing_engine::{
    ExtraCostId, ExtraCostKind, InputField, Marketplace, PricingConfig, PricingResult,
    PricingSession,
};

use crate::cli::render::{print_inputs, print_result};

/// One line typed at the session prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Field(InputField, String),
    Margin(u8),
    FreeShipping(bool),
    MultiplierUp,
    MultiplierDown,
    ExtraAdd,
    ExtraSet(ExtraCostId, String),
    ExtraKind(ExtraCostId, ExtraCostKind),
    ExtraRemove(ExtraCostId),
    Switch(Marketplace),
    Reset,
    Show,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = parts.split_first() else {
        return Err("empty command".to_string());
    };
    let value = || {
        args.first()
            .map(|v| v.to_string())
            .ok_or_else(|| format!("usage: {} <value>", head))
    };

    match head.to_lowercase().as_str() {
        "cost" => Ok(Command::Field(InputField::BaseCost, value()?)),
        "tax" => Ok(Command::Field(InputField::TaxRate, value()?)),
        "expenses" => Ok(Command::Field(InputField::VariableExpenses, value()?)),
        "commission" => Ok(Command::Field(InputField::CommissionRate, value()?)),
        "shipping" => Ok(Command::Field(InputField::ShippingFee, value()?)),
        "margin" => value()?
            .trim_end_matches('%')
            .parse::<u8>()
            .map(|p| Command::Margin(p.min(100)))
            .map_err(|_| "margin must be a whole percentage between 0 and 100".to_string()),
        "free-shipping" => match args.first().copied() {
            Some("on") | Some("yes") => Ok(Command::FreeShipping(true)),
            Some("off") | Some("no") => Ok(Command::FreeShipping(false)),
            _ => Err("usage: free-shipping on|off".to_string()),
        },
        "up" | "+" => Ok(Command::MultiplierUp),
        "down" | "-" => Ok(Command::MultiplierDown),
        "extra" => parse_extra_command(args),
        "switch" => match args.first().copied() {
            Some("shopee") => Ok(Command::Switch(Marketplace::Shopee)),
            Some("ml") | Some("mercado-livre") => Ok(Command::Switch(Marketplace::MercadoLivre)),
            _ => Err("usage: switch shopee|mercado-livre".to_string()),
        },
        "reset" | "clear" => Ok(Command::Reset),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}', type 'help'", other)),
    }
}

const EXTRA_USAGE: &str = "usage: extra add | set <id> <amount> | kind <id> flat|percent | rm <id>";

fn parse_extra_command(args: &[&str]) -> Result<Command, String> {
    let id = |raw: Option<&&str>| {
        raw.and_then(|v| v.trim_start_matches('#').parse::<u32>().ok())
            .map(ExtraCostId)
            .ok_or_else(|| "expected an extra cost id such as 1 or #1".to_string())
    };

    match args.first().copied() {
        Some("add") => Ok(Command::ExtraAdd),
        Some("set") => {
            let amount = args.get(2).ok_or("usage: extra set <id> <amount>")?;
            Ok(Command::ExtraSet(id(args.get(1))?, amount.to_string()))
        }
        Some("kind") => {
            let kind = match args.get(2).copied() {
                Some("flat") | Some("r$") => ExtraCostKind::Flat,
                Some("percent") | Some("%") => ExtraCostKind::Percent,
                _ => return Err("usage: extra kind <id> flat|percent".to_string()),
            };
            Ok(Command::ExtraKind(id(args.get(1))?, kind))
        }
        Some("rm") | Some("remove") => Ok(Command::ExtraRemove(id(args.get(1))?)),
        _ => Err(EXTRA_USAGE.to_string()),
    }
}

/// Line-oriented calculator. Each marketplace keeps its own session, like the
/// two calculator views of the web toolkit.
pub struct InteractiveCLI {
    config: PricingConfig,
    shopee: PricingSession,
    mercado_livre: PricingSession,
    active: Marketplace,
}

impl InteractiveCLI {
    pub fn new(config: PricingConfig, active: Marketplace) -> Self {
        Self {
            shopee: config.session(Marketplace::Shopee),
            mercado_livre: config.session(Marketplace::MercadoLivre),
            config,
            active,
        }
    }

    pub fn session(&self) -> &PricingSession {
        match self.active {
            Marketplace::Shopee => &self.shopee,
            Marketplace::MercadoLivre => &self.mercado_livre,
        }
    }

    fn session_mut(&mut self) -> &mut PricingSession {
        match self.active {
            Marketplace::Shopee => &mut self.shopee,
            Marketplace::MercadoLivre => &mut self.mercado_livre,
        }
    }

    /// Apply a command; `Ok(None)` means the session should end
    pub fn execute(&mut self, command: Command) -> pricing_engine::Result<Option<PricingResult>> {
        let result = match command {
            Command::Field(field, raw) => {
                let committed = self.session_mut().commit(field, &raw)?;
                println!("  {:?} = {}", field, committed.text);
                committed.result
            }
            Command::Margin(percent) => self.session_mut().set_margin_percent(percent),
            Command::FreeShipping(enabled) => self.session_mut().set_free_shipping(enabled)?,
            Command::MultiplierUp => self.session_mut().increment_multiplier(),
            Command::MultiplierDown => self.session_mut().decrement_multiplier(),
            Command::ExtraAdd => {
                let (id, result) = self.session_mut().add_extra_cost();
                println!("  Added extra cost {}", id);
                result
            }
            Command::ExtraSet(id, raw) => self.session_mut().set_extra_cost_amount(id, &raw)?,
            Command::ExtraKind(id, kind) => self.session_mut().set_extra_cost_kind(id, kind)?,
            Command::ExtraRemove(id) => self.session_mut().remove_extra_cost(id)?,
            Command::Switch(marketplace) => {
                // Leaving a calculator view clears it
                self.session_mut().reset();
                self.active = marketplace;
                self.session().result()
            }
            Command::Reset => self.session_mut().reset(),
            Command::Show => {
                print_inputs(self.session());
                self.session().result()
            }
            Command::Help => {
                self.show_help();
                self.session().result()
            }
            Command::Quit => return Ok(None),
        };
        Ok(Some(result))
    }

    pub fn run(&mut self) -> Result<()> {
        self.show_welcome();
        print_result(self.session(), &self.session().result());

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("{}> ", self.active.to_string().cyan().bold());
            io::stdout().flush().context("Failed to flush stdout")?;

            let Some(line) = lines.next() else { break };
            let line = line.context("Failed to read from stdin")?;
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    println!("{} {}", "❌".red(), message);
                    continue;
                }
            };

            match self.execute(command) {
                Ok(Some(result)) => print_result(self.session(), &result),
                Ok(None) => break,
                Err(e) => {
                    warn!("Command rejected: {}", e);
                    println!("{} {}", "❌".red(), e);
                }
            }
        }

        println!("👋 Goodbye!");
        Ok(())
    }

    fn show_welcome(&self) {
        println!();
        let banner = [
            "╔══════════════════════════════════════════════╗",
            "║          SELLER PRICING CALCULATOR           ║",
            "╚══════════════════════════════════════════════╝",
        ];
        for line in banner {
            println!("{}", line.cyan());
        }
        println!(
            "{}",
            format!(
                "Shopee fee per item: {} | type 'help' for commands",
                pricing_engine::locale::format_currency(self.config.shopee.fixed_fee_per_item)
            )
            .yellow()
        );
    }

    fn show_help(&self) {
        println!();
        println!("{}", "Commands".bold());
        println!("  cost <value>              product cost (comma decimals accepted)");
        println!("  tax <percent>             tax rate, clamped to 0..100");
        println!("  expenses <value>          variable expenses per sale");
        println!("  margin <percent>          desired margin on the sale price");
        println!("  up | down                 change the cost multiplier");
        println!("  free-shipping on|off      Shopee free shipping programme");
        println!("  commission <percent>      Mercado Livre commission");
        println!("  shipping <value>          Mercado Livre flat shipping fee");
        println!("  extra add                 add a flat extra cost of zero");
        println!("  extra set <id> <amount>   change an extra cost amount");
        println!("  extra kind <id> flat|%    change an extra cost kind");
        println!("  extra rm <id>             remove an extra cost");
        println!("  switch shopee|ml          change calculator (clears the current one)");
        println!("  reset | show | help | quit");
    }
}
