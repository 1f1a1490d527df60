//! # API Errors
//!
//! Every handler failure ends up here and becomes one HTTP response.
//! JSON failures carry `{"error": ...}`; the missing-token case stays plain
//! text because the provider's callback is a browser redirect.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pay_core::{PaymentError, ProviderBody};
use serde::Serialize;
use thiserror::Error;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse<T: Serialize> {
    pub error: T,
}

impl<T: Serialize> ErrorResponse<T> {
    pub fn new(error: T) -> Self {
        Self { error }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Provider refused the checkout; status and body pass through
    #[error("Provider returned status {status}")]
    Upstream { status: u16, body: ProviderBody },

    #[error("Missing checkout_token")]
    MissingToken,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Payment(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(ErrorResponse::new(err.to_string()))).into_response()
            }
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(ErrorResponse::new(body))).into_response()
            }
            ApiError::MissingToken => {
                (StatusCode::BAD_REQUEST, "Missing checkout_token").into_response()
            }
        }
    }
}
