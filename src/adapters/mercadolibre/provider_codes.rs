//! Second-layer remap from provider cause codes to payment error kinds.
//!
//! The table is data, not code: callers can register additional codes at
//! startup (directly or from a YAML file) without touching the transport.
//!
//! ```yaml
//! cc_rejected_call_for_authorize: card_declined
//! "2001": insufficient_funds
//! ```

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::domain::foundation::{ErrorKind, SdkError};

static DEFAULT_CODES: Lazy<HashMap<String, ErrorKind>> = Lazy::new(|| {
    [
        ("cc_rejected_insufficient_amount", ErrorKind::InsufficientFunds),
        ("cc_rejected_bad_filled_security_code", ErrorKind::InvalidCard),
        ("cc_rejected_bad_filled_card_number", ErrorKind::InvalidCard),
        ("cc_rejected_bad_filled_date", ErrorKind::InvalidCard),
        ("cc_rejected_high_risk", ErrorKind::FraudRejection),
    ]
    .into_iter()
    .map(|(code, kind)| (code.to_string(), kind))
    .collect()
});

/// Failure loading a provider-code table.
#[derive(Debug, Error)]
pub enum ProviderCodeError {
    #[error("failed to read provider code table: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid provider code table: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Extensible mapping from provider cause code to [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCodeMap {
    codes: HashMap<String, ErrorKind>,
}

impl Default for ProviderCodeMap {
    fn default() -> Self {
        Self {
            codes: DEFAULT_CODES.clone(),
        }
    }
}

impl ProviderCodeMap {
    /// A table with no entries; `remap` becomes the identity.
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// Registers or replaces a code.
    pub fn insert(&mut self, code: impl Into<String>, kind: ErrorKind) -> Option<ErrorKind> {
        self.codes.insert(code.into(), kind)
    }

    pub fn get(&self, code: &str) -> Option<ErrorKind> {
        self.codes.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Parses a YAML mapping of `code: kind` (kinds in snake_case).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ProviderCodeError> {
        let codes: HashMap<String, ErrorKind> = serde_yaml::from_str(yaml)?;
        Ok(Self { codes })
    }

    /// Reads a YAML table from disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ProviderCodeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Escalates a classified error to a payment-specific kind when its
    /// provider code is registered.
    ///
    /// Only `ProviderError` and `InvalidRequest` are candidates; every other
    /// kind, and errors without a registered code, pass through unchanged.
    /// Provider code and message are preserved on the rewritten error.
    pub fn remap(&self, error: SdkError) -> SdkError {
        if !matches!(error.kind, ErrorKind::ProviderError | ErrorKind::InvalidRequest) {
            return error;
        }

        let Some(kind) = error.provider_code.as_deref().and_then(|code| self.get(code)) else {
            return error;
        };

        let detail = error.provider_message.as_deref().unwrap_or_default();
        let message = match kind {
            ErrorKind::InsufficientFunds => "insufficient funds".to_string(),
            ErrorKind::InvalidCard => format!("invalid card: {}", detail),
            ErrorKind::FraudRejection => "payment rejected due to fraud risk".to_string(),
            ErrorKind::CardExpired => "card expired".to_string(),
            ErrorKind::CardDeclined => "card declined".to_string(),
            _ => error.message.clone(),
        };

        SdkError {
            kind,
            message,
            ..error
        }
    }
}

impl Extend<(String, ErrorKind)> for ProviderCodeMap {
    fn extend<I: IntoIterator<Item = (String, ErrorKind)>>(&mut self, iter: I) {
        self.codes.extend(iter);
    }
}
