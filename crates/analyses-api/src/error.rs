//! API error types and conversions

use std::any::Any;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// API error type that converts to HTTP responses.
///
/// Only the public message reaches the caller; the cause of a 500 is logged
/// server-side.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("{0}")]
    BadRequest(String),
    /// 404 Not Found
    #[error("{0}")]
    NotFound(String),
    /// 500 Internal Server Error
    #[error("{message}: {cause}")]
    Internal { message: String, cause: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    /// Build the 500 returned when a handler panics
    pub fn from_panic(message: impl Into<String>, panic: Box<dyn Any + Send + 'static>) -> Self {
        let cause = if let Some(s) = panic.downcast_ref::<&str>() {
            format!("handler panicked: {}", s)
        } else if let Some(s) = panic.downcast_ref::<String>() {
            format!("handler panicked: {}", s)
        } else {
            "handler panicked".to_string()
        };
        ApiError::Internal {
            message: message.into(),
            cause,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope: `{ "error": <message> }`
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => {
                tracing::debug!(status = status.as_u16(), %msg, "API client error");
                msg
            }
            ApiError::Internal { message, cause } => {
                tracing::error!(%cause, "{}", message);
                message
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
