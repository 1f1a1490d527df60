//! # Merchant Profile
//!
//! Fixed merchant identity and placeholder contact data stamped onto every
//! checkout object. Loaded from `config/merchant.toml` when present.
//!
//! ```toml
//! name = "ElevateMe"
//! placeholder_last_name = "Customer"
//! source = "relay"
//!
//! [address]
//! line1 = "1 Main St"
//! city = "San Francisco"
//! state = "CA"
//! zipcode = "94105"
//! country = "USA"
//! ```

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Postal address as the provider's checkout object expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

impl PostalAddress {
    /// Stand-in address used while the merchant site does not collect one
    pub fn placeholder() -> Self {
        Self {
            line1: "1 Main St".to_string(),
            line2: None,
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            zipcode: "94105".to_string(),
            country: "USA".to_string(),
        }
    }
}

/// Merchant identity for checkout payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantProfile {
    /// Display name shown on the provider's checkout page
    #[serde(default = "default_name")]
    pub name: String,

    /// Last name used when the shopper gave a single token
    #[serde(default = "default_placeholder_last_name")]
    pub placeholder_last_name: String,

    /// `metadata.source` tag on the checkout object
    #[serde(default = "default_source")]
    pub source: String,

    /// Billing/shipping address
    #[serde(default = "PostalAddress::placeholder")]
    pub address: PostalAddress,
}

fn default_name() -> String {
    "ElevateMe".to_string()
}

fn default_placeholder_last_name() -> String {
    "Customer".to_string()
}

fn default_source() -> String {
    "relay".to_string()
}

impl Default for MerchantProfile {
    fn default() -> Self {
        Self {
            name: default_name(),
            placeholder_last_name: default_placeholder_last_name(),
            source: default_source(),
            address: PostalAddress::placeholder(),
        }
    }
}

impl MerchantProfile {
    /// Parse a profile from TOML text; absent keys take defaults
    pub fn from_toml(content: &str) -> PaymentResult<Self> {
        toml::from_str(content).map_err(|e| PaymentError::Configuration(e.to_string()))
    }

    /// Load a profile from a file
    pub fn from_file(path: impl AsRef<Path>) -> PaymentResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PaymentError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Builder: set address
    pub fn with_address(mut self, address: PostalAddress) -> Self {
        self.address = address;
        self
    }

    /// True while billing/shipping still carry the built-in stand-in address
    pub fn uses_placeholder_address(&self) -> bool {
        self.address == PostalAddress::placeholder()
    }
}
