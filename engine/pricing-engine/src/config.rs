//! Configuration for the pricing toolkit

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::fees::{FeeSchedule, Marketplace, MercadoLivreFees, ShopeeFees};
use crate::session::PricingSession;

/// Prefix of environment overrides, e.g. `PRICING__SHOPEE__FIXED_FEE_PER_ITEM=5`
pub const ENV_PREFIX: &str = "PRICING";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Shopee fee constants
    pub shopee: ShopeeFees,

    /// Mercado Livre selections a new session starts from
    pub mercado_livre: MercadoLivreFees,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl PricingConfig {
    /// Load defaults, then the optional TOML file, then `PRICING__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: PricingConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Fee schedule for a new session on `marketplace`
    pub fn schedule(&self, marketplace: Marketplace) -> FeeSchedule {
        match marketplace {
            Marketplace::Shopee => FeeSchedule::Shopee(self.shopee),
            Marketplace::MercadoLivre => FeeSchedule::MercadoLivre(self.mercado_livre),
        }
    }

    pub fn session(&self, marketplace: Marketplace) -> PricingSession {
        PricingSession::new(self.schedule(marketplace))
    }

    pub fn validate(&self) -> Result<()> {
        FeeSchedule::Shopee(self.shopee).validate()?;
        FeeSchedule::MercadoLivre(self.mercado_livre).validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use std::io::Write;

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_matches_marketplace_constants() {
        let config = PricingConfig::default();
        assert_eq!(config.shopee.commission_standard, 0.14);
        assert_eq!(config.shopee.commission_free_shipping, 0.20);
        assert_eq!(config.shopee.fixed_fee_per_item, 4.0);
        assert_eq!(config.mercado_livre, MercadoLivreFees::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let file = write_toml(
            r#"
            [shopee]
            fixed_fee_per_item = 5.0

            [mercado_livre]
            commission_rate = 0.16
            "#,
        );
        let config = PricingConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.shopee.fixed_fee_per_item, 5.0);
        assert_eq!(config.shopee.commission_standard, 0.14);
        assert_eq!(config.mercado_livre.commission_rate, 0.16);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_rates() {
        let file = write_toml(
            r#"
            [shopee]
            commission_standard = 14.0
            "#,
        );
        let err = PricingConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, PricingError::InvalidFeeSchedule(_)));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = PricingConfig::load(Some(Path::new("/nonexistent/pricing.toml")))
            .unwrap_err();
        assert!(matches!(err, PricingError::Config(_)));
    }

    #[test]
    fn test_session_uses_configured_schedule() {
        let config = PricingConfig {
            mercado_livre: MercadoLivreFees {
                commission_rate: 0.11,
                shipping_fee: 6.0,
            },
            ..Default::default()
        };
        let session = config.session(Marketplace::MercadoLivre);
        assert_eq!(session.schedule().shipping_fee(), 6.0);
        assert_eq!(session.schedule().commission_rate(false), 0.11);
    }
}
