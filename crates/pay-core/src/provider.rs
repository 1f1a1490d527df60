//! # Financing Provider Trait
//!
//! The seam between the HTTP handlers and the provider's REST API.
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────────────┐
//! │ CheckoutInitiator    │──────▶ │ FinancingProvider (trait)    │
//! │ ConfirmationRelay    │        │  ├── create_checkout()       │
//! └──────────────────────┘        │  ├── authorize_transaction() │
//!                                 │  └── public_api_key()        │
//!                                 └──────────────────────────────┘
//!                                                ▲
//!                                        ┌───────┴───────┐
//!                                        │ AffirmClient  │
//!                                        └───────────────┘
//! ```
//!
//! A reply with a non-2xx status is a normal outcome, returned as a
//! [`ProviderReply`]. Only transport and configuration failures are errors.

use crate::checkout::CheckoutPayload;
use crate::error::PaymentResult;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;

/// Reason used when a failed authorization carries no usable message
pub const DEFAULT_FAILURE_REASON: &str = "auth_failed";

/// Opaque checkout token handed back by the provider's callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfirmationToken(String);

impl ConfirmationToken {
    /// Returns `None` for an empty token
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token: String = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider response body: decoded JSON, or the raw text when it is not JSON.
///
/// Serializes as the JSON value itself, or as `{"raw": "<text>"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderBody {
    Json(Value),
    Raw { raw: String },
}

impl ProviderBody {
    /// Best-effort decode of a response body
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => ProviderBody::Json(value),
            Err(_) => ProviderBody::Raw {
                raw: text.to_string(),
            },
        }
    }

    /// First set value among the candidate field names, in order.
    /// `null`, `false`, `0`, and `""` count as unset.
    pub fn first_value(&self, candidates: &[&str]) -> Option<&Value> {
        let ProviderBody::Json(value) = self else {
            return None;
        };
        candidates
            .iter()
            .filter_map(|key| value.get(*key))
            .find(|v| is_set(v))
    }

    /// Checkout redirect URL (`redirect_url`, else `redirect_checkout_url`)
    pub fn redirect_url(&self) -> Option<&Value> {
        self.first_value(&["redirect_url", "redirect_checkout_url"])
    }

    /// Checkout session id (`id`, else `checkout_id`)
    pub fn checkout_id(&self) -> Option<&Value> {
        self.first_value(&["id", "checkout_id"])
    }

    /// Why an authorization failed: `message`, else `type`, else `auth_failed`.
    /// Non-string values are rendered as JSON text.
    pub fn failure_reason(&self) -> Cow<'_, str> {
        match self.first_value(&["message", "type"]) {
            Some(Value::String(s)) => Cow::Borrowed(s),
            Some(other) => Cow::Owned(other.to_string()),
            None => Cow::Borrowed(DEFAULT_FAILURE_REASON),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, ProviderBody::Raw { .. })
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

/// Status and body of one provider call
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: ProviderBody,
}

impl ProviderReply {
    pub fn new(status: u16, body: ProviderBody) -> Self {
        Self { status, body }
    }

    /// Decode a reply from its status and body text
    pub fn from_text(status: u16, text: &str) -> Self {
        Self::new(status, ProviderBody::parse(text))
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Client for a buy-now-pay-later provider's checkout API.
#[async_trait]
pub trait FinancingProvider: Send + Sync {
    /// Submit a checkout object and return the provider's reply.
    async fn create_checkout(&self, payload: &CheckoutPayload) -> PaymentResult<ProviderReply>;

    /// Authorize the transaction identified by a confirmation token.
    async fn authorize_transaction(
        &self,
        token: &ConfirmationToken,
    ) -> PaymentResult<ProviderReply>;

    /// Public API key embedded in checkout objects.
    fn public_api_key(&self) -> &str;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// Whether calls go to the provider's sandbox.
    fn is_sandbox(&self) -> bool {
        false
    }
}

/// Shared handle to a provider (dynamic dispatch)
pub type BoxedFinancingProvider = Arc<dyn FinancingProvider>;
