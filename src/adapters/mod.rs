//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the SDK core to external systems:
//! - `mercadolibre` - HTTP transport, payment API and webhook verification

pub mod mercadolibre;

pub use mercadolibre::{
    MercadoLibreClient, MercadoLibrePaymentAdapter, MercadoLibreWebhookHandler,
    ResilientTransport, RetryPolicy,
};
