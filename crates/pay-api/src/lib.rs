//! # pay-api
//!
//! HTTP API layer for affirm-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The checkout initiator and the confirmation callback relay
//! - Shopper-facing confirm/cancel pages
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-checkout` | Create financed checkout, return redirect URL |
//! | GET | `/affirm-confirm` | Provider callback: authorize, redirect shopper |
//! | GET | `/confirm.html` | Thank-you page |
//! | GET | `/cancel.html` | Cancellation page |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
