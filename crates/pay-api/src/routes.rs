//! # Routes
//!
//! Axum router configuration for the checkout relay.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes:
/// - Checkout:
///   - POST /create-checkout - Create a financed checkout (405 for other methods,
///     including CORS preflight; the merchant site calls it same-origin)
///
/// - Confirmation callback:
///   - GET /affirm-confirm - Authorize and redirect the shopper
///   - GET /api/affirm/confirm - Same handler, merchant-site rewrite path
///
/// - Static pages:
///   - GET /confirm.html - Thank-you page
///   - GET /cancel.html - Cancellation page
pub fn create_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/confirm.html", get(handlers::confirm_page))
        .route("/cancel.html", get(handlers::cancel_page));

    let relay_routes = Router::new()
        .route(
            "/create-checkout",
            post(handlers::create_checkout).fallback(handlers::method_not_allowed),
        )
        .route("/affirm-confirm", get(handlers::confirm_checkout))
        .route("/api/affirm/confirm", get(handlers::confirm_checkout));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .merge(page_routes)
        .merge(relay_routes)
        // Middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
    use axum_test::TestServer;
    use pay_core::{
        CheckoutPayload, ConfirmationToken, FinancingProvider, MerchantProfile, PaymentError,
        PaymentResult, ProviderReply,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Provider double: canned reply, records what it was sent
    struct RecordingProvider {
        reply: Option<ProviderReply>,
        checkouts: Mutex<Vec<Value>>,
        tokens: Mutex<Vec<String>>,
    }

    impl RecordingProvider {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(ProviderReply::from_text(status, body)),
                checkouts: Mutex::new(Vec::new()),
                tokens: Mutex::new(Vec::new()),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                checkouts: Mutex::new(Vec::new()),
                tokens: Mutex::new(Vec::new()),
            })
        }

        fn reply(&self) -> PaymentResult<ProviderReply> {
            self.reply
                .clone()
                .ok_or_else(|| PaymentError::NetworkError("connection refused".into()))
        }

        fn calls(&self) -> usize {
            self.checkouts.lock().unwrap().len() + self.tokens.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl FinancingProvider for RecordingProvider {
        async fn create_checkout(&self, payload: &CheckoutPayload) -> PaymentResult<ProviderReply> {
            self.checkouts
                .lock()
                .unwrap()
                .push(serde_json::to_value(payload).unwrap());
            self.reply()
        }

        async fn authorize_transaction(
            &self,
            token: &ConfirmationToken,
        ) -> PaymentResult<ProviderReply> {
            self.tokens.lock().unwrap().push(token.to_string());
            self.reply()
        }

        fn public_api_key(&self) -> &str {
            "pk_test"
        }

        fn provider_name(&self) -> &'static str {
            "recording"
        }
    }

    fn server(provider: Arc<RecordingProvider>) -> TestServer {
        let state =
            AppState::with_provider(provider, MerchantProfile::default(), AppConfig::default());
        TestServer::new(create_router(state)).unwrap()
    }

    fn forwarded_host() -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-forwarded-host"),
            HeaderValue::from_static("shop.example.com"),
        )
    }

    fn purchase() -> Value {
        json!({
            "program": "Yoga Instructor Training",
            "amount": 250000,
            "name": "Jane Mary Doe",
            "email": "jane@example.com",
            "phone": "555-0100"
        })
    }

    // -------------------------------------------------------------------------
    // POST /create-checkout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_checkout_success() {
        let provider =
            RecordingProvider::replying(200, r#"{"redirect_url":"https://x","id":"abc"}"#);
        let server = server(provider.clone());
        let (name, value) = forwarded_host();

        let response = server
            .post("/create-checkout")
            .add_header(name, value)
            .json(&purchase())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.json::<Value>(),
            json!({"redirect_url": "https://x", "checkout_id": "abc"})
        );

        let sent = provider.checkouts.lock().unwrap()[0].clone();
        assert_eq!(sent["merchant"]["public_api_key"], "pk_test");
        assert_eq!(
            sent["merchant"]["user_confirmation_url"],
            "https://shop.example.com/affirm-confirm"
        );
        assert_eq!(sent["merchant"]["user_cancel_url"], "https://shop.example.com/cancel.html");
        assert_eq!(sent["items"][0]["sku"], "YOGA-INSTRUCTOR-TRAINING");
        assert_eq!(sent["total"], 250000);
        assert_eq!(sent["billing"]["name"]["first"], "Jane");
        assert_eq!(sent["billing"]["name"]["last"], "Mary Doe");
    }

    #[tokio::test]
    async fn test_checkout_numeric_id_passes_through() {
        let provider =
            RecordingProvider::replying(200, r#"{"redirect_url":"https://x","id":12345}"#);
        let (name, value) = forwarded_host();

        let response = server(provider)
            .post("/create-checkout")
            .add_header(name, value)
            .json(&purchase())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.json::<Value>(),
            json!({"redirect_url": "https://x", "checkout_id": 12345})
        );
    }

    #[tokio::test]
    async fn test_checkout_alternate_field_names() {
        let provider = RecordingProvider::replying(
            200,
            r#"{"redirect_checkout_url":"https://y","checkout_id":"def"}"#,
        );
        let (name, value) = forwarded_host();

        let response = server(provider)
            .post("/create-checkout")
            .add_header(name, value)
            .json(&purchase())
            .await;

        assert_eq!(
            response.json::<Value>(),
            json!({"redirect_url": "https://y", "checkout_id": "def"})
        );
    }

    #[tokio::test]
    async fn test_checkout_missing_fields_are_null() {
        let provider = RecordingProvider::replying(200, r#"{"status":"created"}"#);
        let (name, value) = forwarded_host();

        let response = server(provider)
            .post("/create-checkout")
            .add_header(name, value)
            .json(&purchase())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.json::<Value>(),
            json!({"redirect_url": null, "checkout_id": null})
        );
    }

    #[tokio::test]
    async fn test_checkout_single_name_uses_placeholder() {
        let provider = RecordingProvider::replying(200, "{}");
        let server = server(provider.clone());
        let (name, value) = forwarded_host();
        let mut body = purchase();
        body["name"] = json!("Jane");

        server
            .post("/create-checkout")
            .add_header(name, value)
            .json(&body)
            .await;

        let sent = provider.checkouts.lock().unwrap()[0].clone();
        assert_eq!(sent["shipping"]["name"]["first"], "Jane");
        assert_eq!(sent["shipping"]["name"]["last"], "Customer");
    }

    #[tokio::test]
    async fn test_checkout_missing_field_rejected_without_call() {
        for field in ["program", "amount", "name", "email", "phone"] {
            let provider = RecordingProvider::replying(200, "{}");
            let server = server(provider.clone());
            let (name, value) = forwarded_host();
            let mut body = purchase();
            body.as_object_mut().unwrap().remove(field);

            let response = server
                .post("/create-checkout")
                .add_header(name, value)
                .json(&body)
                .await;

            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "field {}", field);
            assert_eq!(
                response.json::<Value>(),
                json!({"error": "Missing required fields."})
            );
            assert_eq!(provider.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_checkout_unparseable_body() {
        let provider = RecordingProvider::replying(200, "{}");
        let server = server(provider.clone());
        let (name, value) = forwarded_host();

        let response = server
            .post("/create-checkout")
            .add_header(name, value)
            .text("program=yoga&amount=100")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "Missing required fields."})
        );
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_checkout_wrong_method() {
        let provider = RecordingProvider::replying(200, "{}");
        let server = server(provider.clone());

        let response = server.get("/create-checkout").await;
        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.text(), "Method Not Allowed");

        let response = server.put("/create-checkout").json(&purchase()).await;
        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);

        let response = server.delete("/create-checkout").await;
        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);

        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_checkout_preflight_not_allowed() {
        let provider = RecordingProvider::replying(200, "{}");
        let server = server(provider.clone());

        let response = server
            .method(Method::OPTIONS, "/create-checkout")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://other.example"),
            )
            .add_header(
                HeaderName::from_static("access-control-request-method"),
                HeaderValue::from_static("POST"),
            )
            .await;

        assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.text(), "Method Not Allowed");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_checkout_provider_error_passes_through() {
        let provider = RecordingProvider::replying(
            422,
            r#"{"message":"Invalid phone number","type":"invalid_field"}"#,
        );
        let (name, value) = forwarded_host();

        let response = server(provider)
            .post("/create-checkout")
            .add_header(name, value)
            .json(&purchase())
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": {"message": "Invalid phone number", "type": "invalid_field"}})
        );
    }

    #[tokio::test]
    async fn test_checkout_provider_error_raw_body() {
        let provider = RecordingProvider::replying(503, "Service Unavailable");
        let (name, value) = forwarded_host();

        let response = server(provider)
            .post("/create-checkout")
            .add_header(name, value)
            .json(&purchase())
            .await;

        assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": {"raw": "Service Unavailable"}})
        );
    }

    #[tokio::test]
    async fn test_checkout_network_failure() {
        let (name, value) = forwarded_host();

        let response = server(RecordingProvider::unreachable())
            .post("/create-checkout")
            .add_header(name, value)
            .json(&purchase())
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "Network error: connection refused"})
        );
    }

    #[tokio::test]
    async fn test_checkout_uses_host_without_forwarded_host() {
        let provider = RecordingProvider::replying(200, "{}");
        let server = server(provider.clone());

        server
            .post("/create-checkout")
            .add_header(
                HeaderName::from_static("host"),
                HeaderValue::from_static("direct.example.com"),
            )
            .json(&purchase())
            .await;

        let sent = provider.checkouts.lock().unwrap()[0].clone();
        assert_eq!(
            sent["merchant"]["user_cancel_url"],
            "https://direct.example.com/cancel.html"
        );
    }

    // -------------------------------------------------------------------------
    // GET /affirm-confirm
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_confirm_missing_token() {
        let provider = RecordingProvider::replying(200, "{}");
        let server = server(provider.clone());
        let (name, value) = forwarded_host();

        let response = server.get("/affirm-confirm").add_header(name, value).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Missing checkout_token");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_confirm_success_redirects() {
        let provider = RecordingProvider::replying(200, r#"{"id":"txn_1","status":"authorized"}"#);
        let server = server(provider.clone());
        let (name, value) = forwarded_host();

        let response = server
            .get("/affirm-confirm")
            .add_query_param("checkout_token", "tok_123")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(
            response.header("location"),
            "https://shop.example.com/confirm.html"
        );
        assert_eq!(*provider.tokens.lock().unwrap(), vec!["tok_123".to_string()]);
    }

    #[tokio::test]
    async fn test_confirm_accepts_checkout_id() {
        let provider = RecordingProvider::replying(200, "{}");
        let server = server(provider.clone());
        let (name, value) = forwarded_host();

        let response = server
            .get("/api/affirm/confirm")
            .add_query_param("checkout_id", "chk_9")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(*provider.tokens.lock().unwrap(), vec!["chk_9".to_string()]);
    }

    #[tokio::test]
    async fn test_confirm_declined_redirects_with_type() {
        let provider = RecordingProvider::replying(402, r#"{"type":"card_declined"}"#);
        let (name, value) = forwarded_host();

        let response = server(provider)
            .get("/affirm-confirm")
            .add_query_param("checkout_token", "tok_123")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(
            response.header("location"),
            "https://shop.example.com/cancel.html?msg=card_declined"
        );
    }

    #[tokio::test]
    async fn test_confirm_declined_prefers_message() {
        let provider = RecordingProvider::replying(
            400,
            r#"{"message":"Checkout expired","type":"invalid_request"}"#,
        );
        let (name, value) = forwarded_host();

        let response = server(provider)
            .get("/affirm-confirm")
            .add_query_param("checkout_token", "tok_123")
            .add_header(name, value)
            .await;

        assert_eq!(
            response.header("location"),
            "https://shop.example.com/cancel.html?msg=Checkout%20expired"
        );
    }

    #[tokio::test]
    async fn test_confirm_non_json_error_body() {
        let provider = RecordingProvider::replying(500, "<html>Internal Error</html>");
        let (name, value) = forwarded_host();

        let response = server(provider)
            .get("/affirm-confirm")
            .add_query_param("checkout_token", "tok_123")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(
            response.header("location"),
            "https://shop.example.com/cancel.html?msg=auth_failed"
        );
    }

    #[tokio::test]
    async fn test_confirm_falls_back_to_host() {
        let provider = RecordingProvider::replying(200, "{}");

        let response = server(provider)
            .get("/affirm-confirm")
            .add_query_param("checkout_token", "tok_123")
            .add_header(
                HeaderName::from_static("host"),
                HeaderValue::from_static("direct.example.com"),
            )
            .await;

        assert_eq!(
            response.header("location"),
            "https://direct.example.com/confirm.html"
        );
    }

    #[tokio::test]
    async fn test_confirm_network_failure() {
        let (name, value) = forwarded_host();

        let response = server(RecordingProvider::unreachable())
            .get("/affirm-confirm")
            .add_query_param("checkout_token", "tok_123")
            .add_header(name, value)
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "Network error: connection refused"})
        );
    }

    // -------------------------------------------------------------------------
    // Pages and health
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_cancel_page_escapes_reason() {
        let server = server(RecordingProvider::replying(200, "{}"));

        let response = server
            .get("/cancel.html")
            .add_query_param("msg", "<b>declined</b>")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(response.text().contains("&lt;b&gt;declined&lt;/b&gt;"));
    }

    #[tokio::test]
    async fn test_cancel_page_escapes_quotes() {
        let server = server(RecordingProvider::replying(200, "{}"));

        let response = server
            .get("/cancel.html")
            .add_query_param("msg", r#"x" onmouseover='alert(1)' & more"#)
            .await;

        let text = response.text();
        assert_eq!(response.status_code(), StatusCode::OK);
        assert!(text.contains("x&quot; onmouseover=&#39;alert(1)&#39; &amp; more"));
        assert!(!text.contains(r#"x" onmouseover"#));
        assert!(!text.contains("'alert(1)'"));
    }

    #[tokio::test]
    async fn test_confirm_page() {
        let server = server(RecordingProvider::replying(200, "{}"));
        let response = server.get("/confirm.html").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let server = server(RecordingProvider::replying(200, "{}"));
        let body = server.get("/health").await.json::<Value>();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["provider"], "recording");
        assert_eq!(body["sandbox"], false);
    }
}
