//! Configuration management for the Commodity Receiving Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with ACOPIO__ prefix (e.g. ACOPIO__SERVER__PORT)
//!
//! Thresholds and prices are read once at startup and handed to the
//! calculation core as an immutable snapshot on every call.

use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    validate_thresholds, Commodity, DiscountThreshold, EngineError, PriceList, PriceRate,
    QualityMetric,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Quality thresholds and price lists
    #[serde(default)]
    pub receiving: ReceivingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReceivingConfig {
    /// Discount thresholds, in the order breakdowns are reported
    #[serde(default)]
    pub thresholds: Vec<DiscountThreshold>,

    /// Metrics that must be measured before a reception can be settled
    #[serde(default)]
    pub required_metrics: Vec<RequiredMetrics>,

    /// Price per kg history
    #[serde(default)]
    pub prices: Vec<PriceRate>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequiredMetrics {
    pub commodity: Commodity,
    pub metrics: Vec<QualityMetric>,
}

impl ReceivingConfig {
    /// Metrics required for a commodity (empty when none are configured)
    pub fn required_for(&self, commodity: Commodity) -> Vec<QualityMetric> {
        self.required_metrics
            .iter()
            .filter(|r| r.commodity == commodity)
            .flat_map(|r| r.metrics.iter().copied())
            .collect()
    }

    pub fn price_list(&self) -> PriceList {
        PriceList::new(self.prices.clone())
    }

    /// Check the snapshot before serving any calculation with it
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_thresholds(&self.thresholds)?;
        for rate in &self.prices {
            if rate.price_per_kg <= rust_decimal::Decimal::ZERO {
                return Err(EngineError::NonPositivePrice(rate.price_per_kg));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("ACOPIO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (ACOPIO_ prefix)
            .add_source(
                Environment::with_prefix("ACOPIO")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load configuration from TOML text on top of the defaults
    #[cfg(test)]
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Self::defaults("test")?
            .add_source(File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults(
        environment: &str,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
