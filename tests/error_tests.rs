// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use noteplan_portal::error::AppError;
use noteplan_portal::services::auth::{AuthError, FieldErrors};
use noteplan_portal::services::storage::StorageError;
use noteplan_portal::services::{ApiError, StartOutcome};

#[test]
fn test_validation_maps_to_unprocessable() {
    let mut fields = FieldErrors::new();
    fields.insert("email".to_string(), "Email inválido".to_string());

    let response = AppError::Auth(AuthError::Validation(fields)).into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_upstream_client_error_keeps_status() {
    let err = AppError::Auth(AuthError::Api(ApiError::Http {
        status: StatusCode::CONFLICT,
        message: "Email já cadastrado".to_string(),
    }));
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
}

#[test]
fn test_upstream_server_error_is_bad_gateway() {
    let err = AppError::Auth(AuthError::Api(ApiError::Http {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message: "Erro 503: Service Unavailable".to_string(),
    }));
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);

    let err = AppError::Auth(AuthError::InvalidResponse);
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn test_request_and_storage_errors() {
    let err = AppError::BadRequest("missing body".to_string());
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

    let err = AppError::Storage(StorageError::Io(std::io::Error::other("disk full")));
    assert_eq!(
        err.into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_dropped_submit_is_too_many_requests() {
    let err = AppError::Auth(AuthError::Dropped(StartOutcome::Busy));
    assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);

    let err = AppError::Auth(AuthError::Dropped(StartOutcome::CoolingDown {
        action_id: "register-submit".to_string(),
        remaining: 3,
    }));
    assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
}
