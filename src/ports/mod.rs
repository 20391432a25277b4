//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the SDK core and the outside world. Adapters implement these ports.
//!
//! - `HttpSender` - One request/response exchange with the provider
//! - `CallContext` - Caller-supplied cancellation and deadline
//! - `WebhookHandler` - Notification authentication and decoding
//! - `PaymentProvider` - Payment lifecycle operations

mod call_context;
mod http_sender;
mod payment_provider;
mod webhook_handler;

pub use call_context::CallContext;
pub use http_sender::{ApiRequest, HttpMethod, HttpSender, RawResponse, MAX_RESPONSE_BYTES};
pub use payment_provider::{
    CreatePaymentRequest, Payment, PaymentProvider, PaymentStatus, Refund, RefundRequest,
};
pub use webhook_handler::WebhookHandler;
