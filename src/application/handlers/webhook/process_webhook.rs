//! ProcessWebhookHandler - Command handler for inbound provider notifications.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::Span;

use crate::config::WebhookConfig;
use crate::domain::foundation::{sanitize, SdkError};
use crate::domain::webhook::{WebhookEvent, WebhookRequest};
use crate::ports::WebhookHandler;

/// Command to process one webhook delivery.
#[derive(Debug, Clone, Default)]
pub struct ProcessWebhookCommand {
    /// Raw request body.
    pub payload: Vec<u8>,
    /// `x-signature` header.
    pub signature: String,
    /// `x-request-id` header.
    pub request_id: String,
    /// `data.id` query parameter.
    pub data_id: String,
}

impl ProcessWebhookCommand {
    /// Header and query values with whitespace trimmed and NULs removed.
    fn sanitized(&self) -> WebhookRequest {
        WebhookRequest {
            body: self.payload.clone(),
            signature: sanitize::clean(&self.signature),
            request_id: sanitize::clean(&self.request_id),
            data_id: sanitize::clean(&self.data_id),
        }
    }
}

impl From<WebhookRequest> for ProcessWebhookCommand {
    fn from(request: WebhookRequest) -> Self {
        Self {
            payload: request.body,
            signature: request.signature,
            request_id: request.request_id,
            data_id: request.data_id,
        }
    }
}

/// Handler that authenticates a delivery, decodes it and hands the event
/// to the caller.
pub struct ProcessWebhookHandler {
    handler: Arc<dyn WebhookHandler>,
    secret: Option<SecretString>,
    span: Span,
}

impl ProcessWebhookHandler {
    pub fn new(handler: Arc<dyn WebhookHandler>, secret: Option<SecretString>) -> Self {
        Self {
            handler,
            secret,
            span: tracing::info_span!("mercadolibre.process_webhook"),
        }
    }

    /// Uses the signing secret from `config`.
    pub fn from_config(handler: Arc<dyn WebhookHandler>, config: &WebhookConfig) -> Self {
        Self::new(handler, config.secret.clone())
    }

    /// Records this handler's events under `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn secret(&self) -> &str {
        self.secret
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .unwrap_or_default()
    }

    /// Validates and parses `cmd`, then passes the event to `on_event`.
    ///
    /// `on_event` runs only for authenticated, well-formed deliveries.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if the body is empty
    /// - `InvalidWebhook` if authentication or decoding fails
    pub fn handle<F>(
        &self,
        cmd: ProcessWebhookCommand,
        on_event: F,
    ) -> Result<WebhookEvent, SdkError>
    where
        F: FnOnce(&WebhookEvent),
    {
        let _guard = self.span.enter();

        if cmd.payload.is_empty() {
            return Err(SdkError::invalid_request("webhook body is empty"));
        }

        let request = cmd.sanitized();
        self.handler.validate(&request, self.secret())?;
        let event = self.handler.parse(&request.body)?;

        tracing::debug!(
            event_type = %event.event_type,
            data_id = %event.data_id,
            "webhook event processed"
        );

        on_event(&event);
        Ok(event)
    }

    /// Only authenticates `cmd`.
    pub fn validate_signature(&self, cmd: &ProcessWebhookCommand) -> Result<(), SdkError> {
        self.handler.validate(&cmd.sanitized(), self.secret())
    }

    /// Only decodes `payload`.
    pub fn parse(&self, payload: &[u8]) -> Result<WebhookEvent, SdkError> {
        self.handler.parse(payload)
    }
}
