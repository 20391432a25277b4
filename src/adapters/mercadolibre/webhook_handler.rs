//! MercadoLibre implementation of the `WebhookHandler` port.
//!
//! # Security
//!
//! - HMAC-SHA256 over the provider manifest, compared in constant time
//! - Symmetric timestamp window (default 5 minutes) against replays
//! - Neither the secret nor the expected hash is ever logged

use std::time::Duration;

use tracing::Span;

use super::webhook_types::MlWebhookPayload;
use crate::domain::foundation::SdkError;
use crate::domain::webhook::{
    build_manifest, check_timestamp, compute_signature, signatures_match, SignatureHeader,
    WebhookAuthError, WebhookEvent, WebhookEventType, WebhookRequest, DEFAULT_TIMESTAMP_TOLERANCE,
};
use crate::ports::WebhookHandler;

/// Verifies and decodes MercadoLibre notifications.
#[derive(Debug, Clone)]
pub struct MercadoLibreWebhookHandler {
    tolerance: Duration,
    span: Span,
}

impl Default for MercadoLibreWebhookHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MercadoLibreWebhookHandler {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TIMESTAMP_TOLERANCE,
            span: tracing::info_span!("mercadolibre.webhook"),
        }
    }

    /// Overrides the timestamp window. A zero duration keeps the default.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        if !tolerance.is_zero() {
            self.tolerance = tolerance;
        }
        self
    }

    /// Records this handler's events under `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// Validates `request` as of `now` (Unix seconds).
    pub fn validate_at(
        &self,
        request: &WebhookRequest,
        secret: &str,
        now: i64,
    ) -> Result<(), WebhookAuthError> {
        let _guard = self.span.enter();

        let result = self.verify(request, secret, now);
        match &result {
            Ok(()) => tracing::debug!(data_id = %request.data_id, "webhook signature validated"),
            Err(err) => tracing::warn!(
                data_id = %request.data_id,
                request_id = %request.request_id,
                reason = %err,
                "webhook validation failed"
            ),
        }
        result
    }

    fn verify(
        &self,
        request: &WebhookRequest,
        secret: &str,
        now: i64,
    ) -> Result<(), WebhookAuthError> {
        if secret.is_empty() {
            return Err(WebhookAuthError::SecretNotConfigured);
        }

        let header = SignatureHeader::parse(&request.signature)?;
        check_timestamp(&header.timestamp, self.tolerance, now)?;

        let manifest = build_manifest(&request.data_id, &request.request_id, &header.timestamp);
        let computed = compute_signature(&manifest, secret.as_bytes());

        if !signatures_match(&computed, &header.hash) {
            return Err(WebhookAuthError::SignatureMismatch);
        }

        Ok(())
    }

    fn decode(&self, payload: &[u8]) -> Result<WebhookEvent, WebhookAuthError> {
        if payload.is_empty() {
            return Err(WebhookAuthError::EmptyPayload);
        }

        let ml: MlWebhookPayload = serde_json::from_slice(payload)
            .map_err(|e| WebhookAuthError::MalformedPayload(e.to_string()))?;

        Ok(WebhookEvent {
            id: ml.id,
            event_type: WebhookEventType::new(ml.action.clone()),
            action: ml.action,
            live_mode: ml.live_mode,
            api_version: ml.api_version,
            user_id: ml.user_id,
            date_created: ml.date_created,
            data_id: ml.data.id,
        })
    }
}

impl WebhookHandler for MercadoLibreWebhookHandler {
    fn validate(&self, request: &WebhookRequest, secret: &str) -> Result<(), SdkError> {
        self.validate_at(request, secret, chrono::Utc::now().timestamp())
            .map_err(SdkError::from)
    }

    fn parse(&self, payload: &[u8]) -> Result<WebhookEvent, SdkError> {
        let _guard = self.span.enter();

        self.decode(payload).map_err(|err| {
            tracing::warn!(reason = %err, bytes = payload.len(), "webhook payload rejected");
            SdkError::from(err)
        })
    }
}
