//! Webhook handlers.
//!
//! ## Commands
//! - Processing inbound provider notifications

mod process_webhook;

pub use process_webhook::{ProcessWebhookCommand, ProcessWebhookHandler};
