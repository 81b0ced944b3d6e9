//! Logging and tracing setup

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, util::SubscriberInitExt, EnvFilter};

use pricing_engine::LoggingConfig;

/// Initialize logging from the configured level and format.
///
/// `RUST_LOG` wins over the configured level when set. Logs go to stderr so
/// quotes printed on stdout stay machine-readable.
pub fn initialize_logging(config: &LoggingConfig) -> Result<()> {
    match config.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => return Err(anyhow!("Invalid log level: {}", other)),
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let fmt_layer = match config.format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        "pretty" => fmt::layer()
            .pretty()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        "compact" => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
        other => return Err(anyhow!("Invalid log format: {}", other)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
