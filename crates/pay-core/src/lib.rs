//! # pay-core
//!
//! Core types and traits for the affirm-relay checkout handlers.
//!
//! This crate provides:
//! - `CheckoutRequest` / `PurchaseIntent` for validating the shopper's purchase
//! - `CheckoutPayload` and `CheckoutUrls` for the provider checkout object
//! - `MerchantProfile` for the fixed merchant identity
//! - `FinancingProvider` trait with `ProviderReply` / `ProviderBody`
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{CheckoutPayload, CheckoutRequest, CheckoutUrls, MerchantProfile};
//!
//! let intent = CheckoutRequest::from_body(&body).validate()?;
//! let urls = CheckoutUrls::from_headers("https", forwarded_host, host)?;
//! let payload = CheckoutPayload::build(&intent, &profile, provider.public_api_key(), &urls);
//!
//! let reply = provider.create_checkout(&payload).await?;
//! if reply.is_success() {
//!     // Send the shopper to reply.body.redirect_url()
//! }
//! ```

pub mod checkout;
pub mod error;
pub mod intent;
pub mod merchant;
pub mod provider;

// Re-exports for convenience
pub use checkout::{
    encode_component, CheckoutPayload, CheckoutUrls, CANCEL_PAGE, CONFIRM_PAGE, CONFIRM_PATH,
};
pub use error::{PaymentError, PaymentResult};
pub use intent::{CheckoutRequest, CustomerName, PurchaseIntent};
pub use merchant::{MerchantProfile, PostalAddress};
pub use provider::{
    BoxedFinancingProvider, ConfirmationToken, FinancingProvider, ProviderBody, ProviderReply,
    DEFAULT_FAILURE_REASON,
};
