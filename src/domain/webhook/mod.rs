//! Inbound notification model and authentication rules.

mod errors;
mod event;
mod signature;

pub use errors::WebhookAuthError;
pub use event::{WebhookEvent, WebhookEventType, WebhookRequest};
pub use signature::{
    build_manifest, check_timestamp, compute_signature, signatures_match, SignatureHeader,
    DEFAULT_TIMESTAMP_TOLERANCE,
};
