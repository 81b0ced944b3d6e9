use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use pricing_engine::{
    ExtraCostKind, InputField, Marketplace, PricingConfig, PricingResult, PricingSession,
};

use crate::cli::interactive::InteractiveCLI;
use crate::cli::render::{print_inputs, print_result};

#[derive(Parser)]
#[command(name = "pricing-cli")]
#[command(about = "Reverse pricing calculators for Shopee and Mercado Livre sellers")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file with marketplace fees
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (pretty, json, compact)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a Shopee listing
    Shopee {
        #[command(flatten)]
        common: QuoteArgs,

        /// Quote without the free shipping programme (standard commission)
        #[arg(long)]
        no_free_shipping: bool,
    },

    /// Price a Mercado Livre listing
    MercadoLivre {
        #[command(flatten)]
        common: QuoteArgs,

        /// Commission rate in percent
        #[arg(long, default_value = "0")]
        commission: String,

        /// Flat shipping fee
        #[arg(long, default_value = "0")]
        shipping: String,
    },

    /// Start an interactive calculator session
    Interactive {
        /// Marketplace to price for
        #[arg(short, long, value_enum, default_value = "shopee")]
        marketplace: MarketplaceArg,
    },
}

/// Entries shared by both marketplaces. Amounts accept comma decimals ("19,90").
#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    /// Product cost
    #[arg(long, default_value = "0")]
    pub cost: String,

    /// Cost multiplier (units per listing)
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub multiplier: u32,

    /// Tax rate in percent
    #[arg(long, default_value = "0")]
    pub tax: String,

    /// Variable expenses per sale
    #[arg(long, default_value = "0")]
    pub expenses: String,

    /// Desired margin in percent of the sale price
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub margin: u8,

    /// Extra cost, flat ("5,50") or percent of the price ("3%"); repeatable
    #[arg(long = "extra", value_parser = parse_extra)]
    pub extras: Vec<ExtraArg>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MarketplaceArg {
    Shopee,
    MercadoLivre,
}

impl From<MarketplaceArg> for Marketplace {
    fn from(arg: MarketplaceArg) -> Self {
        match arg {
            MarketplaceArg::Shopee => Marketplace::Shopee,
            MarketplaceArg::MercadoLivre => Marketplace::MercadoLivre,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtraArg {
    pub amount: String,
    pub kind: ExtraCostKind,
}

pub fn parse_extra(raw: &str) -> Result<ExtraArg, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("extra cost cannot be empty".to_string());
    }
    match raw.strip_suffix('%') {
        Some(amount) => Ok(ExtraArg {
            amount: amount.trim().to_string(),
            kind: ExtraCostKind::Percent,
        }),
        None => Ok(ExtraArg {
            amount: raw.to_string(),
            kind: ExtraCostKind::Flat,
        }),
    }
}

/// Feed the shared entries into a session, in the order a seller fills the form
pub fn apply_quote_args(session: &mut PricingSession, args: &QuoteArgs) -> Result<PricingResult> {
    session.commit(InputField::BaseCost, &args.cost)?;
    for _ in 1..args.multiplier {
        session.increment_multiplier();
    }
    session.commit(InputField::TaxRate, &args.tax)?;
    session.commit(InputField::VariableExpenses, &args.expenses)?;
    session.set_margin_percent(args.margin);
    for extra in &args.extras {
        let (id, _) = session.add_extra_cost();
        session.set_extra_cost_amount(id, &extra.amount)?;
        session.set_extra_cost_kind(id, extra.kind)?;
    }
    Ok(session.result())
}

fn print_quote(session: &PricingSession, result: &PricingResult, json: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(result)
            .context("Failed to serialize result")?;
        println!("{}", output);
    } else {
        print_inputs(session);
        print_result(session, result);
    }
    Ok(())
}

pub fn run(command: Commands, config: &PricingConfig) -> Result<()> {
    match command {
        Commands::Shopee {
            common,
            no_free_shipping,
        } => {
            let mut session = config.session(Marketplace::Shopee);
            session.set_free_shipping(!no_free_shipping)?;
            let result = apply_quote_args(&mut session, &common)?;
            print_quote(&session, &result, common.json)
        }
        Commands::MercadoLivre {
            common,
            commission,
            shipping,
        } => {
            let mut session = config.session(Marketplace::MercadoLivre);
            session.commit(InputField::CommissionRate, &commission)?;
            session.commit(InputField::ShippingFee, &shipping)?;
            let result = apply_quote_args(&mut session, &common)?;
            print_quote(&session, &result, common.json)
        }
        Commands::Interactive { marketplace } => {
            let mut cli = InteractiveCLI::new(config.clone(), marketplace.into());
            cli.run()
        }
    }
}
