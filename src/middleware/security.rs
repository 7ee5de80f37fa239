// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security headers middleware.

use crate::config::Config;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Fallback when the configured origins do not form a valid header value.
const STRICT_CSP: &str = "default-src 'self'; frame-ancestors 'none'";

/// Content Security Policy for the portal pages.
///
/// Video pages embed YouTube players; thumbnails and uploads come from the
/// object storage origin; the browser talks to the content API directly.
pub fn content_security_policy(config: &Config) -> String {
    let storage = config.storage_url.as_deref().unwrap_or("");
    format!(
        "default-src 'self'; \
         img-src 'self' data: https://i.ytimg.com {storage}; \
         media-src 'self' {storage}; \
         frame-src https://www.youtube.com; \
         connect-src 'self' {api}; \
         frame-ancestors 'none'",
        api = config.api_url,
    )
    .replace(" ;", ";")
}

/// Add security headers to all responses.
pub async fn add_security_headers(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Strict-Transport-Security",
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    let csp = HeaderValue::from_str(&content_security_policy(&state.config))
        .unwrap_or_else(|_| HeaderValue::from_static(STRICT_CSP));
    headers.insert("Content-Security-Policy", csp);
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("camera=(), geolocation=(), microphone=(), payment=(), usb=()"),
    );

    response
}
