//! # Affirm API Client
//!
//! Direct Checkout and transaction authorization against Affirm's REST API.
//! Both calls use HTTP Basic auth built from the public/private key pair.

use crate::config::AffirmConfig;
use async_trait::async_trait;
use pay_core::{
    CheckoutPayload, ConfirmationToken, FinancingProvider, PaymentError, PaymentResult,
    ProviderReply,
};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Affirm client
pub struct AffirmClient {
    config: AffirmConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AuthorizeRequest<'a> {
    transaction_id: &'a str,
}

impl AffirmClient {
    /// Create a new client
    pub fn new(config: AffirmConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(AffirmConfig::from_env()?)
    }

    /// POST a JSON body and decode whatever comes back
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> PaymentResult<ProviderReply> {
        let response = self
            .client
            .post(url)
            .header("Authorization", self.config.basic_credential())
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let reply = ProviderReply::from_text(status, &text);
        if reply.body.is_raw() {
            debug!("Affirm returned a non-JSON body: status={}", status);
        }
        Ok(reply)
    }
}

#[async_trait]
impl FinancingProvider for AffirmClient {
    #[instrument(skip(self, payload), fields(order_id = %payload.order_id, total = payload.total))]
    async fn create_checkout(&self, payload: &CheckoutPayload) -> PaymentResult<ProviderReply> {
        debug!(
            "Affirm checkout payload: {}",
            serde_json::to_string(payload)?
        );

        let reply = self.post_json(&self.config.checkout_url(), payload).await?;

        if reply.is_success() {
            info!(
                "Created Affirm checkout: id={:?}",
                reply.body.checkout_id()
            );
        } else {
            warn!("Affirm checkout rejected: status={}, body={:?}", reply.status, reply.body);
        }

        Ok(reply)
    }

    #[instrument(skip(self, token), fields(token = %token))]
    async fn authorize_transaction(
        &self,
        token: &ConfirmationToken,
    ) -> PaymentResult<ProviderReply> {
        info!("Authorizing Affirm transaction");

        let body = AuthorizeRequest {
            transaction_id: token.as_str(),
        };
        let reply = self.post_json(&self.config.transactions_url(), &body).await?;

        debug!("Affirm authorize response: status={}, body={:?}", reply.status, reply.body);
        Ok(reply)
    }

    fn public_api_key(&self) -> &str {
        &self.config.public_key
    }

    fn provider_name(&self) -> &'static str {
        "affirm"
    }

    fn is_sandbox(&self) -> bool {
        self.config.is_sandbox()
    }
}
