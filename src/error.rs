// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::api::ApiError;
use crate::services::auth::{friendly_login_error, AuthError, FieldErrors};
use crate::services::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details, fields) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()), None)
            }
            AppError::Auth(AuthError::Validation(fields)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                None,
                Some(fields.clone()),
            ),
            AppError::Auth(err @ AuthError::Api(ApiError::Http { status, .. }))
                if status.is_client_error() =>
            {
                let status = StatusCode::from_u16(status.as_u16())
                    .unwrap_or(StatusCode::BAD_REQUEST);
                (status, "rejected", Some(friendly_login_error(err)), None)
            }
            AppError::Auth(err @ AuthError::Dropped(_)) => (
                StatusCode::TOO_MANY_REQUESTS,
                "action_dropped",
                Some(err.to_string()),
                None,
            ),
            AppError::Auth(AuthError::Storage(err)) | AppError::Storage(err) => {
                tracing::error!(error = %err, "Session storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None, None)
            }
            AppError::Auth(err) => {
                tracing::warn!(error = %err, "Upstream auth failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    Some(friendly_login_error(err)),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
