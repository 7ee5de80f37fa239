// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{body::Body, response::Response};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use noteplan_portal::config::Config;
use noteplan_portal::routes::create_router;
use noteplan_portal::AppState;
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Signing key for test tokens. The portal never verifies signatures.
#[allow(dead_code)]
pub const TEST_SIGNING_KEY: &[u8] = b"test-signing-key";

/// Create a test app pointing at an unreachable upstream.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_api(&Config::test_default().api_url)
}

/// Create a test app whose content API lives at `api_url` (usually a
/// wiremock server).
#[allow(dead_code)]
pub fn create_test_app_with_api(api_url: &str) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        api_url: api_url.to_string(),
        ..Config::test_default()
    };
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Mint a backend-style session token with `role`, expiring
/// `expires_in_secs` from now (negative for an already expired token).
#[allow(dead_code)]
pub fn create_test_token(role: &str, expires_in_secs: i64) -> String {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Claims<'a> {
        id: &'a str,
        name: &'a str,
        email: &'a str,
        role: &'a str,
        iat: i64,
        exp: i64,
    }

    let now = now_secs();
    let claims = Claims {
        id: "user-42",
        name: "Ana Souza",
        email: "ana@example.com",
        role,
        iat: now,
        exp: now + expires_in_secs,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SIGNING_KEY),
    )
    .unwrap()
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
