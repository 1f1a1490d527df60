//! # Checkout Object
//!
//! The provider-facing checkout payload and the externally visible URLs it
//! embeds. Built fresh per request and dropped after the outbound call.

use crate::error::{PaymentError, PaymentResult};
use crate::intent::{CustomerName, PurchaseIntent};
use crate::merchant::{MerchantProfile, PostalAddress};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use uuid::Uuid;

/// Path of the confirmation callback route
pub const CONFIRM_PATH: &str = "/affirm-confirm";
/// Shopper-facing thank-you page
pub const CONFIRM_PAGE: &str = "/confirm.html";
/// Shopper-facing cancellation page
pub const CANCEL_PAGE: &str = "/cancel.html";

/// Characters left untouched by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query component
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// URLs derived from the host the shopper actually reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    /// e.g. "https://shop.example.com"
    pub base_url: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Derive the base URL from `x-forwarded-host`, falling back to `host`.
    ///
    /// A forwarded header may carry a proxy chain (`a, b`); the first entry
    /// is the client-facing host.
    pub fn from_headers(
        scheme: &str,
        forwarded_host: Option<&str>,
        host: Option<&str>,
    ) -> PaymentResult<Self> {
        let forwarded = forwarded_host
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|h| !h.is_empty());
        let host = forwarded
            .or_else(|| host.map(str::trim).filter(|h| !h.is_empty()))
            .ok_or(PaymentError::MissingHost)?;

        Ok(Self::new(format!("{}://{}", scheme, host)))
    }

    /// Where the provider sends the shopper after authentication
    pub fn confirmation_url(&self) -> String {
        format!("{}{}", self.base_url, CONFIRM_PATH)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, CANCEL_PAGE)
    }

    pub fn confirm_page(&self) -> String {
        format!("{}{}", self.base_url, CONFIRM_PAGE)
    }

    /// Cancellation page carrying an encoded reason
    pub fn cancel_page_with_reason(&self, reason: &str) -> String {
        format!("{}?msg={}", self.cancel_url(), encode_component(reason))
    }
}

// =============================================================================
// Provider Checkout Object
// =============================================================================

/// Checkout object posted to the provider's direct-checkout endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutPayload {
    pub merchant: MerchantBlock,
    pub items: Vec<ItemBlock>,
    pub order_id: String,
    pub currency: &'static str,
    pub shipping_amount: i64,
    pub tax_amount: i64,
    pub total: i64,
    pub metadata: MetadataBlock,
    pub customer: CustomerBlock,
    pub billing: ContactBlock,
    pub shipping: ContactBlock,
}

#[derive(Debug, Clone, Serialize)]
pub struct MerchantBlock {
    pub public_api_key: String,
    pub user_confirmation_url: String,
    pub user_cancel_url: String,
    pub user_confirmation_url_action: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemBlock {
    pub display_name: String,
    pub sku: String,
    pub unit_price: i64,
    pub qty: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataBlock {
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerBlock {
    pub email: String,
    pub phone_number: String,
    pub name: FullName,
}

#[derive(Debug, Clone, Serialize)]
pub struct FullName {
    pub full: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactBlock {
    pub name: ContactName,
    pub address: PostalAddress,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactName {
    pub first: String,
    pub last: String,
    pub full: String,
}

impl From<&CustomerName> for ContactName {
    fn from(name: &CustomerName) -> Self {
        Self {
            first: name.first.clone(),
            last: name.last.clone(),
            full: name.full(),
        }
    }
}

impl CheckoutPayload {
    /// Build the checkout object for one purchase.
    ///
    /// Single item, quantity 1, USD, no shipping or tax: total equals the
    /// purchase amount.
    pub fn build(
        intent: &PurchaseIntent,
        profile: &MerchantProfile,
        public_api_key: &str,
        urls: &CheckoutUrls,
    ) -> Self {
        let name = intent.customer_name(&profile.placeholder_last_name);
        let contact = ContactBlock {
            name: ContactName::from(&name),
            address: profile.address.clone(),
            email: intent.email.clone(),
            phone_number: intent.phone.clone(),
        };

        Self {
            merchant: MerchantBlock {
                public_api_key: public_api_key.to_string(),
                user_confirmation_url: urls.confirmation_url(),
                user_cancel_url: urls.cancel_url(),
                user_confirmation_url_action: "GET",
                name: profile.name.clone(),
            },
            items: vec![ItemBlock {
                display_name: intent.program.clone(),
                sku: intent.sku(),
                unit_price: intent.amount,
                qty: 1,
            }],
            order_id: Uuid::new_v4().to_string(),
            currency: "USD",
            shipping_amount: 0,
            tax_amount: 0,
            total: intent.amount,
            metadata: MetadataBlock {
                source: profile.source.clone(),
            },
            customer: CustomerBlock {
                email: intent.email.clone(),
                phone_number: intent.phone.clone(),
                name: FullName {
                    full: intent.name.clone(),
                },
            },
            billing: contact.clone(),
            shipping: contact,
        }
    }
}
