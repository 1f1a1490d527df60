//! # Request Handlers
//!
//! Axum request handlers for the checkout relay.
//! `create_checkout` starts a financed checkout; `confirm_checkout` handles
//! the provider's confirmation callback and sends the shopper on.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use pay_core::{CheckoutPayload, CheckoutRequest, CheckoutUrls, ConfirmationToken, PaymentResult};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Provider checkout page (redirect the shopper here)
    pub redirect_url: Option<serde_json::Value>,
    /// Provider checkout session id, as the provider typed it
    pub checkout_id: Option<serde_json::Value>,
}

/// Confirmation callback query
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub checkout_token: Option<String>,
    #[serde(default)]
    pub checkout_id: Option<String>,
}

impl ConfirmParams {
    /// `checkout_token`, else `checkout_id`; empty values count as absent
    pub fn token(self) -> Option<ConfirmationToken> {
        self.checkout_token
            .and_then(ConfirmationToken::new)
            .or_else(|| self.checkout_id.and_then(ConfirmationToken::new))
    }
}

/// Cancellation page query
#[derive(Debug, Default, Deserialize)]
pub struct CancelParams {
    #[serde(default)]
    pub msg: Option<String>,
}

/// External base URLs for this request, from the proxy-facing host
fn request_urls(state: &AppState, headers: &HeaderMap) -> PaymentResult<CheckoutUrls> {
    CheckoutUrls::from_headers(
        &state.config.public_scheme,
        header_str(headers, "x-forwarded-host"),
        header_str(headers, header::HOST.as_str()),
    )
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "affirm-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.provider.provider_name(),
        "sandbox": state.provider.is_sandbox()
    }))
}

/// Any method other than POST on the checkout route
pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Create a financed checkout and return the provider's redirect URL
#[instrument(skip(state, headers, body), fields(body_len = body.len()))]
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    let intent = CheckoutRequest::from_body(&body).validate().map_err(|e| {
        warn!("Rejected checkout request: {}", e);
        e
    })?;

    let urls = request_urls(&state, &headers)?;
    let payload = CheckoutPayload::build(
        &intent,
        &state.merchant,
        state.provider.public_api_key(),
        &urls,
    );

    info!(
        "Creating checkout: program={}, amount={}, base_url={}",
        intent.program, intent.amount, urls.base_url
    );

    let reply = state.provider.create_checkout(&payload).await?;

    if !reply.is_success() {
        warn!("Provider rejected checkout: status={}", reply.status);
        return Err(ApiError::Upstream {
            status: reply.status,
            body: reply.body,
        });
    }

    Ok(Json(CreateCheckoutResponse {
        redirect_url: reply.body.redirect_url().cloned(),
        checkout_id: reply.body.checkout_id().cloned(),
    }))
}

/// Provider confirmation callback: authorize, then redirect the shopper
#[instrument(skip(state, headers, params))]
pub async fn confirm_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ConfirmParams>,
) -> Result<Response, ApiError> {
    let token = params.token().ok_or_else(|| {
        warn!("Missing checkout_token in callback URL");
        ApiError::MissingToken
    })?;

    let urls = request_urls(&state, &headers)?;

    let reply = state.provider.authorize_transaction(&token).await?;

    if reply.is_success() {
        info!("Authorized transaction {}", token);
        Ok(found(urls.confirm_page()))
    } else {
        let reason = reply.body.failure_reason();
        warn!(
            "Authorization failed: token={}, status={}, reason={}",
            token, reply.status, reason
        );
        Ok(found(urls.cancel_page_with_reason(&reason)))
    }
}

/// Thank-you page
pub async fn confirm_page() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Application Submitted</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="padding: 60px; text-align: center;">
        <h1>You're all set!</h1>
        <p style="color: #666;">Your financing was approved and your enrollment is confirmed.</p>
    </div>
</body>
</html>
"#,
    )
}

/// Cancellation page, echoing the reason passed by the relay
pub async fn cancel_page(Query(params): Query<CancelParams>) -> impl IntoResponse {
    let reason = params
        .msg
        .filter(|m| !m.is_empty())
        .map(|m| {
            format!(
                r#"<p style="color: #a33;">Reason: <code>{}</code></p>"#,
                escape_html(&m)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Checkout Cancelled</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0;">
    <div style="padding: 60px; text-align: center;">
        <h1>Checkout Cancelled</h1>
        {}
        <p style="color: #666;">No charges were made.</p>
    </div>
</body>
</html>
"#,
        reason
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
