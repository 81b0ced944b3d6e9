//! Seller pricing CLI
//!
//! Terminal front-end for the reverse pricing engine:
//! - shopee / mercado-livre: one-shot quotes from flags
//! - interactive: a live calculator session per marketplace

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::commands::{run, Cli};
use logging::initialize_logging;
use pricing_engine::PricingConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PricingConfig::load(cli.config.as_deref())
        .context("Failed to load pricing configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }

    initialize_logging(&config.logging)?;
    info!(
        "Starting pricing CLI v{} (engine v{})",
        env!("CARGO_PKG_VERSION"),
        pricing_engine::VERSION
    );

    run(cli.command, &config)
}
