//! # Payment Error Types
//!
//! Typed error handling for the checkout relay.
//! Provider rejections (non-2xx replies) are not errors here; they travel
//! as [`ProviderReply`](crate::ProviderReply) values. `PaymentError` covers
//! bad input and failures that stop a request from completing.

use thiserror::Error;

/// Core error type for checkout and confirmation operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One or more purchase fields absent, empty, or out of range
    #[error("Missing required fields.")]
    MissingFields,

    /// Neither `x-forwarded-host` nor `host` was supplied
    #[error("Missing host header")]
    MissingHost,

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true if the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        matches!(self, PaymentError::MissingFields | PaymentError::MissingHost)
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(e: serde_json::Error) -> Self {
        PaymentError::Serialization(e.to_string())
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
