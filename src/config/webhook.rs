//! Webhook verification configuration

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Inbound notification settings
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Shared signing secret from the provider dashboard
    pub secret: Option<SecretString>,

    /// Allowed distance between now and the signed timestamp, in seconds
    #[serde(default = "default_tolerance")]
    pub timestamp_tolerance_secs: u64,
}

impl WebhookConfig {
    pub fn tolerance(&self) -> Duration {
        Duration::from_secs(self.timestamp_tolerance_secs)
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timestamp_tolerance_secs == 0 {
            return Err(ValidationError::InvalidTolerance);
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            timestamp_tolerance_secs: default_tolerance(),
        }
    }
}

fn default_tolerance() -> u64 {
    300
}
