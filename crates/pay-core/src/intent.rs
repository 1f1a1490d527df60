//! # Purchase Intent
//!
//! The shopper's purchase request as posted by the merchant site, and the
//! validated form the checkout builder works from.

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Raw checkout request body. Every field is optional until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub program: Option<String>,
    /// Amount in minor currency units. Kept loose so a float or string
    /// fails validation rather than JSON decoding.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CheckoutRequest {
    /// Decode a request body. Anything that is not a JSON object of the
    /// expected shape becomes an empty request, which then fails validation.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Validate into a [`PurchaseIntent`]
    pub fn validate(self) -> PaymentResult<PurchaseIntent> {
        let amount = self
            .amount
            .as_ref()
            .and_then(|v| v.as_i64())
            .filter(|cents| *cents > 0)
            .ok_or(PaymentError::MissingFields)?;

        Ok(PurchaseIntent {
            program: required(self.program)?,
            amount,
            name: required(self.name)?,
            email: required(self.email)?,
            phone: required(self.phone)?,
        })
    }
}

fn required(field: Option<String>) -> PaymentResult<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(PaymentError::MissingFields)
}

/// A validated purchase: all five fields present, amount positive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseIntent {
    /// Program (product) display name
    pub program: String,
    /// Amount in cents
    pub amount: i64,
    /// Shopper's full name as typed
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl PurchaseIntent {
    /// SKU derived from the program name: upper-cased, whitespace runs
    /// replaced by `-`
    pub fn sku(&self) -> String {
        self.program
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_uppercase()
    }

    /// Split the shopper's name into first/last
    pub fn customer_name(&self, placeholder_last: &str) -> CustomerName {
        CustomerName::split(&self.name, placeholder_last)
    }
}

/// First/last name pair sent in billing and shipping blocks.
///
/// The split is naive: first token, then everything else. Honorifics and
/// multi-part given names end up in the wrong half.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerName {
    pub first: String,
    pub last: String,
}

impl CustomerName {
    pub fn split(full: &str, placeholder_last: &str) -> Self {
        let mut tokens = full.split_whitespace();
        let first = tokens.next().unwrap_or_default().to_string();
        let rest: Vec<&str> = tokens.collect();
        let last = if rest.is_empty() {
            placeholder_last.to_string()
        } else {
            rest.join(" ")
        };
        Self { first, last }
    }

    pub fn full(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}
