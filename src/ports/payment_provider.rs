//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations. Implementations
//! translate between these types and the provider's wire format and map
//! provider failures onto [`SdkError`] kinds, including payment-specific
//! rejections (insufficient funds, invalid card, fraud).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CallContext;
use crate::domain::foundation::SdkError;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment.
    async fn create_payment(
        &self,
        ctx: &CallContext,
        request: CreatePaymentRequest,
    ) -> Result<Payment, SdkError>;

    /// Get payment by provider ID.
    async fn get_payment(&self, ctx: &CallContext, payment_id: &str) -> Result<Payment, SdkError>;

    /// Cancel a pending payment.
    async fn cancel_payment(&self, ctx: &CallContext, payment_id: &str) -> Result<(), SdkError>;

    /// Refund a payment fully, or partially when `amount` is set.
    async fn refund_payment(
        &self,
        ctx: &CallContext,
        request: RefundRequest,
    ) -> Result<Refund, SdkError>;
}

/// Request to create a payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    /// Amount in major currency units.
    pub amount: f64,

    /// Merchant-side reference.
    pub external_reference: Option<String>,

    /// Statement description.
    pub description: Option<String>,

    /// Provider payment method id (e.g. `visa`, `pix`, `yape`).
    pub payment_method_id: Option<String>,

    /// Card token from the client-side tokenizer.
    pub token: Option<String>,

    /// Number of installments.
    pub installments: Option<u32>,

    /// Payer email address.
    pub payer_email: Option<String>,

    /// URL the provider notifies about status changes.
    pub notification_url: Option<String>,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Payment in the provider system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Provider's payment ID.
    pub id: String,

    /// Current status.
    pub status: PaymentStatus,

    /// Provider's status detail (e.g. `cc_rejected_insufficient_amount`).
    pub status_detail: String,

    /// Transaction amount.
    pub amount: f64,

    /// ISO 4217 currency code.
    pub currency: String,

    /// Merchant-side reference.
    pub external_reference: Option<String>,

    /// Creation timestamp as reported by the provider.
    pub date_created: Option<String>,
}

impl Payment {
    pub fn is_approved(&self) -> bool {
        self.status == PaymentStatus::Approved
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, PaymentStatus::Pending | PaymentStatus::InProcess)
    }

    pub fn can_refund(&self) -> bool {
        self.is_approved()
    }
}

/// Payment status from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Approved,
    Authorized,
    InProcess,
    InMediation,
    Rejected,
    Cancelled,
    Refunded,
    ChargedBack,
    Unknown,
}

impl PaymentStatus {
    /// Maps the provider's status string.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "pending" => PaymentStatus::Pending,
            "approved" => PaymentStatus::Approved,
            "authorized" => PaymentStatus::Authorized,
            "in_process" => PaymentStatus::InProcess,
            "in_mediation" => PaymentStatus::InMediation,
            "rejected" => PaymentStatus::Rejected,
            "cancelled" => PaymentStatus::Cancelled,
            "refunded" => PaymentStatus::Refunded,
            "charged_back" => PaymentStatus::ChargedBack,
            _ => PaymentStatus::Unknown,
        }
    }
}

/// Request to refund a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    /// Provider's payment ID.
    pub payment_id: String,

    /// Partial amount; `None` refunds in full.
    pub amount: Option<f64>,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Refund in the provider system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    pub payment_id: String,
    pub amount: f64,
    pub status: String,
}
