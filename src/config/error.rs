//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid request timeout (must be 1-300 seconds)")]
    InvalidTimeout,

    #[error("Unsupported country code: {0}")]
    UnsupportedCountry(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Initial backoff must be greater than zero")]
    InvalidInitialBackoff,

    #[error("Max backoff is smaller than initial backoff")]
    InvalidMaxBackoff,

    #[error("Webhook timestamp tolerance must be greater than zero")]
    InvalidTolerance,
}
