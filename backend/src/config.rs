//! Configuration management for the pharmacy alerts server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PHARMACY__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    validate_near_expiry_days, AlertAggregator, BatchOrder, ExpirationPolicy, LowStockOrder,
    DEFAULT_NEAR_EXPIRY_DAYS,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// External pharmacy API
    pub api: ApiConfig,

    /// JWT verification
    pub jwt: JwtConfig,

    /// Alert policy
    pub alerts: AlertsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the pharmacy REST API (e.g. https://api.example.com/api)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Service token forwarded as a bearer token, if the API requires one
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret used to verify session tokens issued by the pharmacy API
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    /// Days before expiration at which a batch is flagged
    pub near_expiry_days: i64,

    #[serde(default)]
    pub low_stock_order: LowStockOrder,

    #[serde(default)]
    pub batch_order: BatchOrder,
}

impl AlertsConfig {
    /// Aggregator configured with the operator's defaults
    pub fn aggregator(&self) -> AlertAggregator {
        AlertAggregator::new(ExpirationPolicy::new(self.near_expiry_days))
            .with_low_stock_order(self.low_stock_order)
            .with_batch_order(self.batch_order)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PHARMACY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("api.base_url", "http://localhost:4000/api")?
            .set_default("api.timeout_secs", 10)?
            .set_default("alerts.near_expiry_days", DEFAULT_NEAR_EXPIRY_DAYS)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PHARMACY__ prefix)
            .add_source(
                Environment::with_prefix("PHARMACY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_near_expiry_days(self.alerts.near_expiry_days)
            .map_err(|e| ConfigError::Message(format!("alerts.near_expiry_days: {}", e)))?;

        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".to_string()));
        }
        Ok(())
    }
}
