//! Wiring of the MercadoLibre adapters from configuration.

use std::sync::Arc;

use secrecy::SecretString;

use super::payment_adapter::MercadoLibrePaymentAdapter;
use super::provider_codes::ProviderCodeMap;
use super::reqwest_sender::ReqwestSender;
use super::transport::ResilientTransport;
use super::webhook_handler::MercadoLibreWebhookHandler;
use crate::config::SdkConfig;
use crate::domain::foundation::SdkError;

/// Entry point bundling the transport, payment adapter and webhook handler.
#[derive(Clone)]
pub struct MercadoLibreClient {
    sender: Arc<ReqwestSender>,
    transport: ResilientTransport,
    payments: MercadoLibrePaymentAdapter,
    webhooks: MercadoLibreWebhookHandler,
}

impl MercadoLibreClient {
    /// Builds every component from `config`.
    ///
    /// The config is not validated here; call [`SdkConfig::validate`] first
    /// to reject out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` for an unusable base URL, or `Internal` if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &SdkConfig) -> Result<Self, SdkError> {
        let mut sender =
            ReqwestSender::new(config.client.payments_base_url(), config.client.timeout())?;
        if let Some(token) = &config.client.access_token {
            sender = sender.with_access_token(token.clone());
        }
        let sender = Arc::new(sender);

        let transport = ResilientTransport::new(sender.clone(), config.retry.policy());
        let payments = MercadoLibrePaymentAdapter::new(transport.clone());
        let webhooks =
            MercadoLibreWebhookHandler::new().with_tolerance(config.webhook.tolerance());

        tracing::debug!(
            base_url = %sender.base_url(),
            max_retries = config.retry.max_retries,
            "mercadolibre client configured"
        );

        Ok(Self {
            sender,
            transport,
            payments,
            webhooks,
        })
    }

    /// Replaces the provider-code table used by the payment adapter.
    pub fn with_provider_codes(mut self, codes: ProviderCodeMap) -> Self {
        self.payments = self.payments.with_provider_codes(codes);
        self
    }

    /// Swaps the bearer token after an OAuth refresh.
    pub fn set_access_token(&self, token: SecretString) {
        self.sender.set_access_token(Some(token));
    }

    pub fn transport(&self) -> &ResilientTransport {
        &self.transport
    }

    pub fn payments(&self) -> &MercadoLibrePaymentAdapter {
        &self.payments
    }

    pub fn webhooks(&self) -> &MercadoLibreWebhookHandler {
        &self.webhooks
    }
}
