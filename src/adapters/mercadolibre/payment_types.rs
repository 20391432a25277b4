//! Wire formats for the `/v1/payments` resource.

use serde::{Deserialize, Serialize};

use crate::ports::{CreatePaymentRequest, Payment, PaymentStatus, Refund, RefundRequest};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MlCreatePaymentRequest {
    pub transaction_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<MlPayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlPayer {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl From<&CreatePaymentRequest> for MlCreatePaymentRequest {
    fn from(req: &CreatePaymentRequest) -> Self {
        Self {
            transaction_amount: req.amount,
            description: req.description.clone(),
            payment_method_id: req.payment_method_id.clone(),
            external_reference: req.external_reference.clone(),
            payer: req.payer_email.clone().map(|email| MlPayer { email }),
            token: req.token.clone(),
            installments: req.installments,
            notification_url: req.notification_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MlPaymentResponse {
    pub id: i64,
    pub status: String,
    pub status_detail: String,
    pub external_reference: Option<String>,
    pub transaction_amount: f64,
    pub currency_id: String,
    pub date_created: Option<String>,
}

impl From<MlPaymentResponse> for Payment {
    fn from(ml: MlPaymentResponse) -> Self {
        Self {
            id: ml.id.to_string(),
            status: PaymentStatus::from_provider(&ml.status),
            status_detail: ml.status_detail,
            amount: ml.transaction_amount,
            currency: ml.currency_id,
            external_reference: ml.external_reference.filter(|r| !r.is_empty()),
            date_created: ml.date_created,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MlRefundRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl From<&RefundRequest> for MlRefundRequest {
    fn from(req: &RefundRequest) -> Self {
        Self { amount: req.amount }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MlRefundResponse {
    pub id: i64,
    pub payment_id: i64,
    pub amount: f64,
    pub status: String,
}

impl From<MlRefundResponse> for Refund {
    fn from(ml: MlRefundResponse) -> Self {
        Self {
            id: ml.id.to_string(),
            payment_id: ml.payment_id.to_string(),
            amount: ml.amount,
            status: ml.status,
        }
    }
}

/// Body of the cancellation update.
#[derive(Debug, Clone, Serialize)]
pub struct MlStatusUpdate {
    pub status: &'static str,
}

impl MlStatusUpdate {
    pub fn cancelled() -> Self {
        Self { status: "cancelled" }
    }
}
