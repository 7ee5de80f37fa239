// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: login, registration and logout.
//!
//! The browser posts its form here; the handler runs the auth flow against
//! the content API and answers with where to go next, mirroring the token
//! into the `auth_token` cookie.

use crate::error::{AppError, Result};
use crate::middleware::edge_guard::LOGIN_PATH;
use crate::models::UserProfile;
use crate::services::auth::{AuthFlow, LoginForm, RegisterForm};
use crate::services::cooldown::CooldownCoordinator;
use crate::services::session::TOKEN_KEY;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session/login", post(login))
        .route("/session/register", post(register))
        .route("/session/logout", post(logout))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Page the client should navigate to
    pub redirect: String,
    pub user: Option<UserProfile>,
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginForm>, JsonRejection>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let Json(form) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let flow = AuthFlow::new(
        state.api.clone(),
        state.request_session(None)?,
        state.auth_cooldown(&form.email),
    );
    let outcome = flow.login(&form).await?;

    Ok((
        jar.add(outcome.cookie),
        Json(SessionResponse {
            redirect: outcome.landing.to_string(),
            user: outcome.user,
        }),
    ))
}

async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<RegisterForm>, JsonRejection>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let Json(form) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let flow = AuthFlow::new(
        state.api.clone(),
        state.request_session(None)?,
        state.auth_cooldown(&form.email),
    );
    let outcome = flow.register(&form).await?;

    let jar = match outcome.cookie {
        Some(cookie) => jar.add(cookie),
        None => jar,
    };

    Ok((
        jar,
        Json(SessionResponse {
            redirect: outcome.landing.to_string(),
            user: flow.session().get_user(),
        }),
    ))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = jar.get(TOKEN_KEY).map(|c| c.value().to_owned());
    // Logout never goes through a submit button's cooldown
    let flow = AuthFlow::new(
        state.api.clone(),
        state.request_session(token.as_deref())?,
        CooldownCoordinator::new(),
    );
    let removal = flow.logout().await?;

    tracing::info!(had_session = token.is_some(), "Logged out");

    Ok((
        jar.add(removal),
        Json(SessionResponse {
            redirect: LOGIN_PATH.to_string(),
            user: None,
        }),
    ))
}
