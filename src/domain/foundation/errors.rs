//! Canonical error types shared by every SDK component.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of failure categories surfaced to SDK callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed request or rejected input (HTTP 400).
    InvalidRequest,

    /// Credentials missing or rejected (HTTP 401).
    Unauthorized,

    /// Credentials valid but access denied (HTTP 403).
    Forbidden,

    /// Resource does not exist (HTTP 404).
    NotFound,

    /// Conflicting state on the provider side (HTTP 409).
    Conflict,

    /// Provider rate limit exceeded (HTTP 429).
    RateLimited,

    /// Request or gateway timeout, or the caller cancelled the call.
    Timeout,

    /// Connection, DNS, body read failure or oversized response.
    NetworkError,

    /// Any other provider-side failure.
    ProviderError,

    /// Inbound notification failed authentication or decoding.
    InvalidWebhook,

    /// Payment rejected for insufficient funds.
    InsufficientFunds,

    /// Card data rejected by the provider.
    InvalidCard,

    /// Card is past its expiry date.
    CardExpired,

    /// Card declined by the issuer.
    CardDeclined,

    /// Payment rejected by the provider's risk engine.
    FraudRejection,

    /// Failure inside the SDK itself.
    Internal,
}

impl ErrorKind {
    /// Whether an operation failing with this kind may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited | ErrorKind::Timeout | ErrorKind::NetworkError
        )
    }

    /// Stable upper-case code for logs and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::RateLimited => "RATE_LIMITED",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::ProviderError => "PROVIDER_ERROR",
            ErrorKind::InvalidWebhook => "INVALID_WEBHOOK",
            ErrorKind::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorKind::InvalidCard => "INVALID_CARD",
            ErrorKind::CardExpired => "CARD_EXPIRED",
            ErrorKind::CardDeclined => "CARD_DECLINED",
            ErrorKind::FraudRejection => "FRAUD_REJECTION",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error returned by every SDK operation.
///
/// Carries exactly one [`ErrorKind`], a human-readable message and, when the
/// provider supplied one, its own cause code and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkError {
    /// Error category.
    pub kind: ErrorKind,

    /// Human-readable message.
    pub message: String,

    /// Provider's cause code (if available).
    pub provider_code: Option<String>,

    /// Provider's cause description (if available).
    pub provider_message: Option<String>,
}

impl SdkError {
    /// Create a new error without provider details.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider_code: None,
            provider_message: None,
        }
    }

    /// Attach the provider's cause code and description.
    pub fn with_provider(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.provider_code = Some(code.into());
        self.provider_message = Some(message.into());
        self
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidWebhook, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a not found error for a named resource.
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", resource))
    }

    /// Whether the failed operation may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.provider_code {
            Some(code) => write!(
                f,
                "[{}] {} (provider: {} - {})",
                self.kind,
                self.message,
                code,
                self.provider_message.as_deref().unwrap_or_default()
            ),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for SdkError {}
