//! MercadoLibre / MercadoPago provider adapter.
//!
//! Outbound calls go through [`ResilientTransport`], which retries
//! rate-limited, timed-out and network failures with exponential backoff
//! and classifies every error response. Inbound notifications are verified
//! by [`MercadoLibreWebhookHandler`].
//!
//! # Configuration
//!
//! See [`crate::config::SdkConfig`]; [`MercadoLibreClient::from_config`]
//! wires everything together.

mod client;
mod error_classifier;
mod payment_adapter;
mod payment_types;
mod provider_codes;
mod reqwest_sender;
mod retry;
mod transport;
mod webhook_handler;
mod webhook_types;

pub use client::MercadoLibreClient;
pub use error_classifier::{ErrorCause, ErrorClassifier, ErrorEnvelope};
pub use payment_adapter::MercadoLibrePaymentAdapter;
pub use provider_codes::{ProviderCodeError, ProviderCodeMap};
pub use reqwest_sender::{ReqwestSender, DEFAULT_TIMEOUT};
pub use retry::RetryPolicy;
pub use transport::ResilientTransport;
pub use webhook_handler::MercadoLibreWebhookHandler;
pub use webhook_types::{MlWebhookData, MlWebhookPayload};
