//! Error types and error handling for the application
//!
//! This module defines the HTTP-boundary error type. All errors implement
//! `IntoResponse` to provide consistent error formatting; internal failures
//! never leak their details to clients.

use crate::domain::ValidationError;
use crate::service::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Client input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Subscription with the given ID was not found
    #[error("subscription not found")]
    NotFound,

    /// Request body is not valid JSON for the endpoint
    #[error("invalid json")]
    InvalidJson,

    /// Query string could not be decoded
    #[error("invalid query")]
    InvalidQuery,

    /// Request took longer than the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(cause) => AppError::Validation(cause),
            ServiceError::NotFound => AppError::NotFound,
            ServiceError::Storage(source) => AppError::Internal(source.into()),
        }
    }
}

impl AppError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidJson | AppError::InvalidQuery => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
