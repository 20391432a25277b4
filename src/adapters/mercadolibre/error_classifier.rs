//! First-layer classification of provider error responses.

use serde::Deserialize;

use crate::domain::foundation::{ErrorKind, SdkError};

/// Best-effort shape of a provider error body. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorEnvelope {
    pub message: String,
    pub error: String,
    pub status: i64,
    pub cause: Vec<ErrorCause>,
}

/// One entry of the envelope's `cause` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ErrorCause {
    pub code: String,
    pub description: String,
}

impl ErrorEnvelope {
    /// Decodes `body`, yielding an empty envelope when it is not a JSON
    /// object of the expected shape.
    pub fn decode(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// `message`, then `error`, then `HTTP <status>`.
    pub fn message_or(&self, status: u16) -> String {
        if !self.message.is_empty() {
            self.message.clone()
        } else if !self.error.is_empty() {
            self.error.clone()
        } else {
            format!("HTTP {}", status)
        }
    }
}

/// Maps an HTTP error status and body onto an [`SdkError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Kind for an HTTP status code.
    pub fn kind_for_status(status: u16) -> ErrorKind {
        match status {
            400 => ErrorKind::InvalidRequest,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            408 | 504 => ErrorKind::Timeout,
            _ => ErrorKind::ProviderError,
        }
    }

    /// Classifies an error response. Never fails: a malformed body only
    /// loses the message and provider details.
    pub fn classify(&self, status: u16, body: &[u8]) -> SdkError {
        let envelope = ErrorEnvelope::decode(body);
        let error = SdkError::new(Self::kind_for_status(status), envelope.message_or(status));

        match envelope.cause.into_iter().next() {
            Some(cause) => error.with_provider(cause.code, cause.description),
            None => error,
        }
    }
}
