//! Consistent error envelope for all API endpoints.
//!
//! Every failure is returned as
//! `{ "error": { "code", "message", "details"? }, "meta": { "timestamp", "version" } }`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::validation::ValidationError;

/// Metadata included in every error response.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Error detail inside [`ApiErrorResponse`].
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &str, msg: impl Into<String>, details: Option<Value>) -> Response {
        let body = Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: msg.into(),
                details,
            },
            meta: ResponseMeta::default(),
        };
        (status, axum::Json(body)).into_response()
    }

    /// 400 naming the offending field, value and valid range.
    pub fn validation(err: &ValidationError) -> Response {
        Self::build(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string(), Some(err.details()))
    }

    /// Body could not be read as the expected JSON shape. Keeps the
    /// extractor's status (400, 413, 415 or 422).
    pub fn rejected(rejection: &JsonRejection) -> Response {
        Self::build(rejection.status(), "INVALID_REQUEST", rejection.body_text(), None)
    }

    pub fn not_found(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::NOT_FOUND, "NOT_FOUND", msg, None)
    }
}
