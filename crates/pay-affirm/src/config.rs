//! # Affirm Configuration
//!
//! Configuration management for the Affirm integration.
//! Keys are loaded from environment variables, never hardcoded.

use base64::{engine::general_purpose::STANDARD, Engine};
use pay_core::PaymentError;
use std::env;
use std::time::Duration;

/// Default API host; live traffic needs `AFFIRM_BASE` set explicitly
pub const SANDBOX_BASE_URL: &str = "https://sandbox.affirm.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Affirm API configuration
#[derive(Clone)]
pub struct AffirmConfig {
    /// Public API key (also embedded in checkout objects)
    pub public_key: String,

    /// Private API key
    pub private_key: String,

    /// API base URL, no trailing slash
    pub api_base_url: String,

    /// Per-request timeout for outbound calls
    pub timeout: Duration,
}

impl AffirmConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `AFFIRM_PUBLIC_KEY`
    /// - `AFFIRM_PRIVATE_KEY`
    ///
    /// Optional:
    /// - `AFFIRM_BASE` (default: sandbox)
    /// - `AFFIRM_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PaymentError> {
        let public_key = required_var(&lookup, "AFFIRM_PUBLIC_KEY")?;
        let private_key = required_var(&lookup, "AFFIRM_PRIVATE_KEY")?;

        let mut config = Self::new(public_key, private_key);

        if let Some(base) = lookup("AFFIRM_BASE") {
            if !base.trim().is_empty() {
                config = config.with_api_base_url(base.trim());
            }
        }

        if let Some(secs) = lookup("AFFIRM_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                PaymentError::Configuration(format!(
                    "AFFIRM_TIMEOUT_SECS is not a number: {}",
                    secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            api_base_url: SANDBOX_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check if pointed at the sandbox
    pub fn is_sandbox(&self) -> bool {
        self.api_base_url.contains("sandbox")
    }

    /// Get authorization header value: `Basic base64(public:private)`
    pub fn basic_credential(&self) -> String {
        let raw = format!("{}:{}", self.public_key, self.private_key);
        format!("Basic {}", STANDARD.encode(raw))
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn checkout_url(&self) -> String {
        format!("{}/api/v2/checkout/direct", self.api_base_url)
    }

    pub fn transactions_url(&self) -> String {
        format!("{}/api/v1/transactions", self.api_base_url)
    }
}

impl std::fmt::Debug for AffirmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffirmConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn required_var(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, PaymentError> {
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| PaymentError::Configuration(format!("{} not set", name)))
}
