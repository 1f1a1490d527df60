//! # Affirm Relay
//!
//! Checkout initiator and confirmation relay for Affirm financing.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export AFFIRM_PUBLIC_KEY=...
//! export AFFIRM_PRIVATE_KEY=...
//! export AFFIRM_BASE=https://sandbox.affirm.com   # optional
//!
//! # Run the server
//! affirm-relay
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging (LOG_FORMAT=json for structured output)
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Provider: {} (sandbox: {})",
        state.provider.provider_name(),
        state.provider.is_sandbox()
    );
    info!("Merchant: {}", state.merchant.name);

    if state.merchant.uses_placeholder_address() {
        warn!(
            "Billing/shipping use the placeholder address; \
             set [address] in the merchant profile"
        );
    }
    if is_prod && state.provider.is_sandbox() {
        warn!("Running in production against the Affirm sandbox");
    }

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Affirm relay starting on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/create-checkout", addr);
        info!("Callback: GET  http://{}/affirm-confirm?checkout_token=...", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
