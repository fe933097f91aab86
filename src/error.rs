use std::{any::Any, fmt::Display};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed field in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Internal {
        message: String,
        /// Only filled in development.
        detail: Option<String>,
    },
}

impl AppError {
    /// Builds a 500 error, keeping the cause's text only when `expose` is set.
    pub fn internal(message: impl Into<String>, cause: impl Display, expose: bool) -> Self {
        let message = message.into();
        tracing::error!(error = %cause, "{}", message);
        AppError::Internal {
            message,
            detail: expose.then(|| cause.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Validation failed",
                    errors: Some(errors.as_slice()),
                    error: None,
                },
            ),
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, message_only(m)),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, message_only(m)),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, message_only(m)),
            AppError::Internal { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    message,
                    errors: None,
                    error: detail.as_deref(),
                },
            ),
        };

        if !status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

fn message_only(message: &str) -> ErrorBody<'_> {
    ErrorBody {
        message,
        errors: None,
        error: None,
    }
}

/// Renders a caught handler panic as the generic 500 body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, expose: bool) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".into());
    tracing::error!(panic = %detail, "handler panicked");
    AppError::Internal {
        message: "Something went wrong".into(),
        detail: expose.then_some(detail),
    }
    .into_response()
}
