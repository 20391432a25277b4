//! Canonical inbound notification types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider action string carried verbatim.
///
/// Known actions are exposed as constants; anything else the provider sends
/// is kept unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WebhookEventType(String);

impl WebhookEventType {
    pub const PAYMENT_CREATED: &'static str = "payment.created";
    pub const PAYMENT_UPDATED: &'static str = "payment.updated";
    pub const REFUND_CREATED: &'static str = "refund.created";
    pub const CHARGEBACK_CREATED: &'static str = "chargeback.created";
    pub const SHIPMENT_CREATED: &'static str = "shipment.created";
    pub const SHIPMENT_UPDATED: &'static str = "shipment.updated";
    pub const QR_SCANNED: &'static str = "qr.scanned";
    pub const QR_PAID: &'static str = "qr.paid";

    pub fn new(action: impl Into<String>) -> Self {
        Self(action.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_payment_event(&self) -> bool {
        matches!(self.as_str(), Self::PAYMENT_CREATED | Self::PAYMENT_UPDATED)
    }

    pub fn is_shipment_event(&self) -> bool {
        matches!(self.as_str(), Self::SHIPMENT_CREATED | Self::SHIPMENT_UPDATED)
    }

    pub fn is_qr_event(&self) -> bool {
        matches!(self.as_str(), Self::QR_SCANNED | Self::QR_PAID)
    }

    pub fn is_refund_event(&self) -> bool {
        self.as_str() == Self::REFUND_CREATED
    }

    pub fn is_chargeback_event(&self) -> bool {
        self.as_str() == Self::CHARGEBACK_CREATED
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inbound notification as extracted by the HTTP-facing handler.
///
/// `data_id` and `request_id` come from the request's query string and
/// `x-request-id` header; they are signed together with the timestamp.
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    /// Raw request body.
    pub body: Vec<u8>,

    /// Raw `x-signature` header value.
    pub signature: String,

    /// Raw `x-request-id` header value.
    pub request_id: String,

    /// Resource id the notification refers to.
    pub data_id: String,
}

/// Canonical representation of a provider notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Notification id.
    pub id: i64,

    /// Event type (the provider's action string, verbatim).
    pub event_type: WebhookEventType,

    /// Raw action string.
    pub action: String,

    /// Whether the notification comes from production (not sandbox).
    pub live_mode: bool,

    /// Provider API version.
    pub api_version: String,

    /// Provider user the notification belongs to.
    pub user_id: i64,

    /// Creation timestamp as received, unparsed.
    pub date_created: String,

    /// Id of the resource the notification refers to (`data.id`).
    pub data_id: String,
}

impl WebhookEvent {
    pub fn is_live(&self) -> bool {
        self.live_mode
    }
}
