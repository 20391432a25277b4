//! Webhook authentication and decoding errors.

use thiserror::Error;

use crate::domain::foundation::{ErrorKind, SdkError};

/// Errors that occur while authenticating or decoding an inbound notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookAuthError {
    /// No shared secret was configured for verification.
    #[error("webhook secret not configured")]
    SecretNotConfigured,

    /// The signature header lacked a non-empty `ts` or `v1` entry.
    #[error("invalid signature format")]
    InvalidSignatureFormat,

    /// The `ts` entry is not a decimal Unix timestamp.
    #[error("invalid timestamp in signature")]
    InvalidTimestamp,

    /// The timestamp is further from now than the tolerance allows.
    #[error("timestamp outside tolerance window")]
    TimestampOutsideTolerance,

    /// The computed HMAC does not match the header's hash.
    #[error("signature verification failed")]
    SignatureMismatch,

    /// The notification body was empty.
    #[error("empty webhook payload")]
    EmptyPayload,

    /// The notification body is not valid JSON of the expected shape.
    #[error("failed to parse webhook payload: {0}")]
    MalformedPayload(String),
}

impl WebhookAuthError {
    /// Canonical kind reported to callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebhookAuthError::EmptyPayload => ErrorKind::InvalidRequest,
            _ => ErrorKind::InvalidWebhook,
        }
    }
}

impl From<WebhookAuthError> for SdkError {
    fn from(err: WebhookAuthError) -> Self {
        SdkError::new(err.kind(), err.to_string())
    }
}
