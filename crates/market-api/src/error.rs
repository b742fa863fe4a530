//! Error types for the marketplace API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use market_store::StoreError;
use otp_ledger::OtpError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid or expired OTP")]
    InvalidOtp,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Not authorized, {0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Schema(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
            ApiError::InvalidOtp => (StatusCode::BAD_REQUEST, "INVALID_OTP"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Schema(_) => (StatusCode::BAD_REQUEST, "SCHEMA_VALIDATION"),
            ApiError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // Internal detail goes to the log, never to the wire.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{}", self);
            "Something went wrong".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match &e {
            StoreError::Schema { .. } => ApiError::Schema(e.to_string()),
            // Uniqueness violations on auth paths are races, not caller input
            StoreError::Duplicate { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<OtpError> for ApiError {
    fn from(_: OtpError) -> Self {
        ApiError::InvalidOtp
    }
}
