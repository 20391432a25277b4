//! WebhookHandler port - authentication and decoding of inbound notifications.

use crate::domain::foundation::SdkError;
use crate::domain::webhook::{WebhookEvent, WebhookRequest};

/// Port for provider-specific webhook verification.
///
/// Both operations are stateless and safe to call concurrently.
pub trait WebhookHandler: Send + Sync {
    /// Verifies the notification's signature and freshness.
    ///
    /// Fails closed with `InvalidWebhook` on any ambiguity.
    fn validate(&self, request: &WebhookRequest, secret: &str) -> Result<(), SdkError>;

    /// Decodes a notification body into a canonical event.
    ///
    /// Empty payloads fail with `InvalidRequest`, malformed ones with
    /// `InvalidWebhook`. Identical input yields an identical event.
    fn parse(&self, payload: &[u8]) -> Result<WebhookEvent, SdkError>;
}
