//! API client configuration

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use super::error::ValidationError;
use crate::domain::region::{Country, Endpoints};

/// Connection settings for the provider API
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// OAuth access token sent as a bearer token
    pub access_token: Option<SecretString>,

    /// OAuth application id.
    ///
    /// Not read by this crate; loaded for the OAuth code-exchange and
    /// refresh flows that callers run before `set_access_token`.
    pub client_id: Option<String>,

    /// OAuth application secret, for the same external OAuth flows.
    pub client_secret: Option<SecretString>,

    /// ISO country code selecting the regional endpoints
    #[serde(default = "default_country")]
    pub country: String,

    /// Per-request network timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Overrides the payments API base (tests, sandboxes)
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Payments API base URL, honouring `base_url` when set.
    ///
    /// Unknown country codes fall back to the default region.
    pub fn payments_base_url(&self) -> String {
        match self.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            Some(url) => url.trim().to_string(),
            None => Endpoints::for_country_code(&self.country)
                .payments_api
                .to_string(),
        }
    }

    /// Validate client configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.country.parse::<Country>().is_err() {
            return Err(ValidationError::UnsupportedCountry(self.country.clone()));
        }
        if let Some(raw) = &self.base_url {
            let raw = raw.trim();
            let usable = Url::parse(raw)
                .map(|url| !url.cannot_be_a_base() && matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !usable {
                return Err(ValidationError::InvalidBaseUrl(raw.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            client_id: None,
            client_secret: None,
            country: default_country(),
            timeout_secs: default_timeout(),
            base_url: None,
        }
    }
}

fn default_country() -> String {
    Country::default().code().to_string()
}

fn default_timeout() -> u64 {
    30
}
