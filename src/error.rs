//! Error codes and the JSON error body returned by routes.
//!
//! Every domain error implements [`ErrorCode`] so the route layer can render
//! a uniform `{code, message, retryable}` payload without matching on each
//! module's variants.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Trait for domain errors that carry a grepable code.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

/// HTTP error: a status plus the coded body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        Self {
            status,
            body: ErrorBody { code: err.error_code(), message: err.to_string(), retryable: err.retryable() },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, code = self.body.code, message = %self.body.message, "request failed");
        } else {
            tracing::info!(status = %self.status, code = self.body.code, message = %self.body.message, "request rejected");
        }
        (self.status, Json(self.body)).into_response()
    }
}
