// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page shell routes.
//!
//! Each page answers with the data its client bundle needs to boot: the
//! route that was served and the user decoded from the session cookie. The
//! edge guard has already run by the time these handlers see a request.

use crate::middleware::edge_guard::valid_session;
use crate::models::UserProfile;
use crate::services::session::TOKEN_KEY;
use crate::time_utils::{format_unix_rfc3339, now_unix};
use crate::AppState;
use axum::{http::Uri, routing::get, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(page_shell))
        .route("/planner-tutorial", get(page_shell))
        .route("/login", get(page_shell))
        .route("/register", get(page_shell))
        .route("/dashboard", get(page_shell))
        .route("/admin", get(page_shell))
        .route("/perfil", get(page_shell))
        .route("/suporte", get(page_shell))
        .route("/categories/{slug}", get(page_shell))
        .route("/categories/{slug}/video/{video}", get(page_shell))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageShell {
    pub route: String,
    pub user: Option<UserProfile>,
    /// RFC 3339 expiry of the session token, when it carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_expires_at: Option<String>,
}

async fn page_shell(uri: Uri, jar: CookieJar) -> Json<PageShell> {
    let token = jar.get(TOKEN_KEY).map(|c| c.value().to_owned());
    let claims = valid_session(token.as_deref(), now_unix());

    Json(PageShell {
        route: uri.path().to_string(),
        user: claims.as_ref().map(|c| c.to_profile()),
        session_expires_at: claims.and_then(|c| c.exp_secs()).and_then(format_unix_rfc3339),
    })
}
