//! SDK configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `MERCADOLIBRE` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use mercadolibre_sdk::config::SdkConfig;
//!
//! let config = SdkConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using payments API at {}", config.client.payments_base_url());
//! ```

mod client;
mod error;
mod retry;
mod webhook;

pub use client::ClientConfig;
pub use error::{ConfigError, ValidationError};
pub use retry::RetryConfig;
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// Root SDK configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// (unauthenticated) configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SdkConfig {
    /// API connection settings (credentials, country, timeout)
    #[serde(default)]
    pub client: ClientConfig,

    /// Retry budget and backoff bounds
    #[serde(default)]
    pub retry: RetryConfig,

    /// Webhook signing secret and replay window
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl SdkConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MERCADOLIBRE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MERCADOLIBRE__CLIENT__ACCESS_TOKEN=APP_USR-...` -> `client.access_token`
    /// - `MERCADOLIBRE__RETRY__MAX_RETRIES=5` -> `retry.max_retries = 5`
    /// - `MERCADOLIBRE__WEBHOOK__SECRET=...` -> `webhook.secret`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MERCADOLIBRE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an out-of-range timeout, an unsupported
    /// country, inconsistent backoff bounds or a zero replay window.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.client.validate()?;
        self.retry.validate()?;
        self.webhook.validate()?;
        Ok(())
    }
}
