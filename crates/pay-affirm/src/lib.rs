//! # pay-affirm
//!
//! Affirm client for affirm-relay.
//!
//! `AffirmClient` implements `pay_core::FinancingProvider` over two endpoints:
//!
//! | Call | Endpoint |
//! |------|----------|
//! | Direct Checkout | `POST {base}/api/v2/checkout/direct` |
//! | Authorize | `POST {base}/api/v1/transactions` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_affirm::AffirmClient;
//! use pay_core::FinancingProvider;
//!
//! // Reads AFFIRM_PUBLIC_KEY / AFFIRM_PRIVATE_KEY / AFFIRM_BASE
//! let client = AffirmClient::from_env()?;
//!
//! let reply = client.create_checkout(&payload).await?;
//! println!("redirect: {:?}", reply.body.redirect_url());
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::AffirmClient;
pub use config::{AffirmConfig, SANDBOX_BASE_URL};
