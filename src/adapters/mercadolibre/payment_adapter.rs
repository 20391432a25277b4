//! MercadoLibre payment provider adapter.
//!
//! Implements `PaymentProvider` over the retrying transport. Errors from the
//! transport are escalated through the provider-code table, so payment
//! rejections surface as `InsufficientFunds`, `InvalidCard` or
//! `FraudRejection` instead of a generic bad request.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::IgnoredAny;
use url::Url;

use super::payment_types::{
    MlCreatePaymentRequest, MlPaymentResponse, MlRefundRequest, MlRefundResponse, MlStatusUpdate,
};
use super::provider_codes::ProviderCodeMap;
use super::transport::ResilientTransport;
use crate::domain::foundation::SdkError;
use crate::ports::{
    ApiRequest, CallContext, CreatePaymentRequest, Payment, PaymentProvider, Refund,
    RefundRequest,
};

const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

/// Payment operations against `/v1/payments`.
#[derive(Clone)]
pub struct MercadoLibrePaymentAdapter {
    transport: ResilientTransport,
    codes: Arc<ProviderCodeMap>,
}

impl MercadoLibrePaymentAdapter {
    /// Creates an adapter using the default provider-code table.
    pub fn new(transport: ResilientTransport) -> Self {
        Self {
            transport,
            codes: Arc::new(ProviderCodeMap::default()),
        }
    }

    /// Replaces the provider-code table used to escalate errors.
    pub fn with_provider_codes(mut self, codes: impl Into<Arc<ProviderCodeMap>>) -> Self {
        self.codes = codes.into();
        self
    }

    fn map_error(&self, err: SdkError) -> SdkError {
        self.codes.remap(err)
    }

    fn payment_path(payment_id: &str) -> Result<String, SdkError> {
        Ok(format!("/v1/payments/{}", encode_segment(payment_id)?))
    }
}

/// Percent-encodes one path segment, including any `/`.
fn encode_segment(segment: &str) -> Result<String, SdkError> {
    if segment.trim().is_empty() {
        return Err(SdkError::invalid_request("payment id is required"));
    }

    let mut url = Url::parse("http://localhost")
        .map_err(|e| SdkError::internal(format!("invalid path base: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| SdkError::internal("path base cannot hold segments"))?
        .clear()
        .push(segment);

    Ok(url.path().trim_start_matches('/').to_string())
}

#[async_trait]
impl PaymentProvider for MercadoLibrePaymentAdapter {
    async fn create_payment(
        &self,
        ctx: &CallContext,
        request: CreatePaymentRequest,
    ) -> Result<Payment, SdkError> {
        tracing::debug!(
            external_reference = request.external_reference.as_deref().unwrap_or_default(),
            "create_payment"
        );

        let mut api_request =
            ApiRequest::post("/v1/payments").with_json(&MlCreatePaymentRequest::from(&request))?;
        if let Some(key) = request.idempotency_key.as_deref().filter(|k| !k.is_empty()) {
            api_request = api_request.with_header(IDEMPOTENCY_HEADER, key);
        }

        let ml: MlPaymentResponse = self
            .transport
            .send_json(api_request, ctx)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(ml.into())
    }

    async fn get_payment(&self, ctx: &CallContext, payment_id: &str) -> Result<Payment, SdkError> {
        tracing::debug!(payment_id, "get_payment");

        let ml: MlPaymentResponse = self
            .transport
            .get_json(ctx, &Self::payment_path(payment_id)?)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(ml.into())
    }

    async fn cancel_payment(&self, ctx: &CallContext, payment_id: &str) -> Result<(), SdkError> {
        tracing::debug!(payment_id, "cancel_payment");

        let _: IgnoredAny = self
            .transport
            .put_json(ctx, &Self::payment_path(payment_id)?, &MlStatusUpdate::cancelled())
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(())
    }

    async fn refund_payment(
        &self,
        ctx: &CallContext,
        request: RefundRequest,
    ) -> Result<Refund, SdkError> {
        tracing::debug!(payment_id = %request.payment_id, "refund_payment");

        let path = format!("{}/refunds", Self::payment_path(&request.payment_id)?);
        let mut api_request =
            ApiRequest::post(path).with_json(&MlRefundRequest::from(&request))?;
        if let Some(key) = request.idempotency_key.as_deref().filter(|k| !k.is_empty()) {
            api_request = api_request.with_header(IDEMPOTENCY_HEADER, key);
        }

        let ml: MlRefundResponse = self
            .transport
            .send_json(api_request, ctx)
            .await
            .map_err(|e| self.map_error(e))?;

        Ok(ml.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::adapters::mercadolibre::RetryPolicy;
    use crate::domain::foundation::ErrorKind;
    use crate::ports::{HttpMethod, HttpSender, PaymentStatus, RawResponse};

    /// Answers every request with the same response and records requests.
    struct FixedSender {
        status: u16,
        body: &'static str,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl FixedSender {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> ApiRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpSender for FixedSender {
        async fn send(&self, request: &ApiRequest, _: usize) -> Result<RawResponse, SdkError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(RawResponse::new(self.status, self.body.as_bytes().to_vec()))
        }
    }

    fn adapter(sender: Arc<FixedSender>) -> MercadoLibrePaymentAdapter {
        MercadoLibrePaymentAdapter::new(ResilientTransport::new(sender, RetryPolicy::no_retry()))
    }

    const APPROVED: &str = r#"{"id": 555, "status": "approved", "status_detail": "accredited",
        "transaction_amount": 100.0, "currency_id": "PEN", "external_reference": "order-1"}"#;

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(encode_segment("123").unwrap(), "123");
        assert_eq!(encode_segment("12 3/4").unwrap(), "12%203%2F4");
        assert_eq!(encode_segment("a?b#c").unwrap(), "a%3Fb%23c");
        assert_eq!(
            encode_segment("  ").unwrap_err().kind,
            ErrorKind::InvalidRequest
        );
    }

    #[tokio::test]
    async fn create_payment_posts_with_idempotency_key() {
        let sender = FixedSender::new(201, APPROVED);
        let request = CreatePaymentRequest {
            amount: 100.0,
            external_reference: Some("order-1".to_string()),
            idempotency_key: Some("idem-1".to_string()),
            ..Default::default()
        };

        let payment = adapter(sender.clone())
            .create_payment(&CallContext::new(), request)
            .await
            .unwrap();

        assert_eq!(payment.id, "555");
        assert!(payment.is_approved());
        assert_eq!(payment.external_reference.as_deref(), Some("order-1"));

        let sent = sender.last();
        assert_eq!(sent.method(), HttpMethod::Post);
        assert_eq!(sent.path(), "/v1/payments");
        assert_eq!(sent.header("x-idempotency-key"), Some("idem-1"));
    }

    #[tokio::test]
    async fn get_payment_encodes_id() {
        let sender = FixedSender::new(200, APPROVED);

        adapter(sender.clone())
            .get_payment(&CallContext::new(), "55/5")
            .await
            .unwrap();

        assert_eq!(sender.last().path(), "/v1/payments/55%2F5");
    }

    #[tokio::test]
    async fn cancel_payment_puts_cancelled_status() {
        let sender = FixedSender::new(200, r#"{"id": 555, "status": "cancelled"}"#);

        adapter(sender.clone())
            .cancel_payment(&CallContext::new(), "555")
            .await
            .unwrap();

        let sent = sender.last();
        assert_eq!(sent.method(), HttpMethod::Put);
        assert_eq!(sent.body(), Some(&br#"{"status":"cancelled"}"#[..]));
    }

    #[tokio::test]
    async fn refund_payment_posts_amount() {
        let sender = FixedSender::new(
            201,
            r#"{"id": 9001, "payment_id": 555, "amount": 25.5, "status": "approved"}"#,
        );
        let request = RefundRequest {
            payment_id: "555".to_string(),
            amount: Some(25.5),
            idempotency_key: None,
        };

        let refund = adapter(sender.clone())
            .refund_payment(&CallContext::new(), request)
            .await
            .unwrap();

        assert_eq!(refund.id, "9001");
        assert_eq!(refund.payment_id, "555");
        assert_eq!(refund.amount, 25.5);

        let sent = sender.last();
        assert_eq!(sent.path(), "/v1/payments/555/refunds");
        assert_eq!(sent.body(), Some(&br#"{"amount":25.5}"#[..]));
        assert_eq!(sent.header(IDEMPOTENCY_HEADER), None);
    }

    // ══════════════════════════════════════════════════════════════
    // Error escalation
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn insufficient_amount_becomes_insufficient_funds() {
        let sender = FixedSender::new(
            400,
            r#"{"message":"payment rejected","cause":[{"code":"cc_rejected_insufficient_amount","description":"insufficient amount"}]}"#,
        );

        let err = adapter(sender)
            .create_payment(&CallContext::new(), CreatePaymentRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InsufficientFunds);
        assert_eq!(err.provider_code.as_deref(), Some("cc_rejected_insufficient_amount"));
    }

    #[tokio::test]
    async fn custom_codes_are_honoured() {
        let sender = FixedSender::new(
            500,
            r#"{"cause":[{"code":"2004","description":"bad expiry"}]}"#,
        );
        let mut codes = ProviderCodeMap::default();
        codes.insert("2004", ErrorKind::CardExpired);

        let err = adapter(sender)
            .with_provider_codes(codes)
            .get_payment(&CallContext::new(), "1")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::CardExpired);
    }

    #[tokio::test]
    async fn not_found_is_not_escalated() {
        let sender = FixedSender::new(
            404,
            r#"{"message":"not found","cause":[{"code":"cc_rejected_high_risk","description":""}]}"#,
        );

        let err = adapter(sender)
            .get_payment(&CallContext::new(), "1")
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn pending_payment_status_maps() {
        let sender = FixedSender::new(200, r#"{"id": 1, "status": "in_process"}"#);

        let payment = adapter(sender)
            .get_payment(&CallContext::new(), "1")
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::InProcess);
        assert!(payment.is_pending());
    }
}
