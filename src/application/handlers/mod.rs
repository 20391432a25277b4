//! Application handlers.
//!
//! Command handlers that orchestrate ports.

pub mod webhook;

pub use webhook::{ProcessWebhookCommand, ProcessWebhookHandler};
