// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Edge route guard.
//!
//! Runs before any page handler, once per navigation. Reads the
//! `auth_token` cookie, decodes its claims locally and redirects based on
//! session presence, expiry and role.

use crate::models::{Claims, Role};
use crate::services::session::TOKEN_KEY;
use crate::services::token::decode_claims;
use crate::time_utils::now_unix;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_LANDING: &str = "/dashboard";
pub const ADMIN_LANDING: &str = "/admin";

/// Paths that need a valid session.
const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/admin", "/perfil", "/categories", "/suporte"];
/// Paths only for visitors without a session.
const AUTH_ONLY_PREFIXES: &[&str] = &["/login", "/register"];
/// Paths that need role ADMIN.
const ADMIN_PREFIXES: &[&str] = &["/admin"];

/// Paths the guard never looks at.
const EXCLUDED_PREFIXES: &[&str] = &[
    "/api",
    "/_next/static",
    "/_next/image",
    "/favicon.ico",
    "/health",
    "/session",
];
const EXCLUDED_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

/// How the guard treats a path. A path can be in several classes (`/admin`
/// is both protected and admin-only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteClass {
    pub protected: bool,
    pub auth_only: bool,
    pub admin_only: bool,
}

impl RouteClass {
    pub fn is_public(&self) -> bool {
        !self.protected && !self.auth_only && !self.admin_only
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// `path` is `prefix` itself or lies below it.
fn under(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn classify(path: &str) -> RouteClass {
    let any = |prefixes: &[&str]| prefixes.iter().any(|p| under(path, p));
    RouteClass {
        protected: any(PROTECTED_PREFIXES),
        auth_only: any(AUTH_ONLY_PREFIXES),
        admin_only: any(ADMIN_PREFIXES),
    }
}

/// Framework internals, API calls and static images bypass the guard.
pub fn is_excluded(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    EXCLUDED_PREFIXES.iter().any(|p| under(path, p))
        || EXCLUDED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Claims of a usable session: a non-empty token that decodes and has not
/// expired. An `exp` claim must be strictly greater than `now`.
pub fn valid_session(token: Option<&str>, now: i64) -> Option<Claims> {
    let token = token.filter(|t| !t.is_empty())?;
    let Some(claims) = decode_claims(token) else {
        tracing::debug!("Session cookie does not decode");
        return None;
    };
    if claims.is_expired_at(now) {
        tracing::debug!(exp = ?claims.exp(), now, "Session cookie expired");
        return None;
    }
    Some(claims)
}

/// Login URL that returns to `path` after authentication.
///
/// Segments are normalized (decoded, then re-encoded) so a path that already
/// arrives percent-encoded is not encoded twice.
pub fn login_redirect(path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| {
            let decoded = urlencoding::decode(segment).map(|d| d.into_owned());
            urlencoding::encode(&decoded.unwrap_or_else(|_| segment.to_string())).into_owned()
        })
        .collect();
    format!("{}?redirect={}", LOGIN_PATH, encoded.join("/"))
}

/// Apply the guard's decision table to one navigation.
pub fn evaluate(path: &str, token: Option<&str>, now: i64) -> GuardDecision {
    let class = classify(path);
    if class.is_public() {
        return GuardDecision::Allow;
    }

    let session = valid_session(token, now);

    match session {
        None if class.protected => GuardDecision::Redirect(login_redirect(path)),
        Some(_) if class.auth_only => GuardDecision::Redirect(DEFAULT_LANDING.to_string()),
        Some(claims) if class.admin_only && claims.role() != Role::Admin => {
            GuardDecision::Redirect(DEFAULT_LANDING.to_string())
        }
        _ => GuardDecision::Allow,
    }
}

/// Middleware wrapping every page route.
pub async fn edge_guard(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if is_excluded(&path) {
        return next.run(request).await;
    }

    let token = jar.get(TOKEN_KEY).map(|c| c.value().to_owned());

    match evaluate(&path, token.as_deref(), now_unix()) {
        GuardDecision::Allow => {
            tracing::debug!(path = %path, has_token = token.is_some(), "Navigation allowed");
            next.run(request).await
        }
        GuardDecision::Redirect(location) => {
            tracing::info!(
                path = %path,
                has_token = token.is_some(),
                location = %location,
                "Navigation redirected"
            );
            Redirect::temporary(&location).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    const NOW: i64 = 1_750_000_000;

    fn token(claims: serde_json::Value) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(claims.to_string()))
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("/admin/videos"),
            RouteClass {
                protected: true,
                auth_only: false,
                admin_only: true
            }
        );
        assert!(classify("/categories/planners/video/intro").protected);
        assert!(classify("/login").auth_only);
        assert!(classify("/register").auth_only);
        assert!(classify("/").is_public());
        assert!(classify("/planner-tutorial").is_public());
        assert!(classify("/administrator").is_public());
        assert!(classify("/dashboards").is_public());
    }

    #[test]
    fn test_expired_session_redirects_to_login() {
        let expired = token(serde_json::json!({"role": "MEMBER", "exp": NOW - 1}));
        assert_eq!(
            evaluate("/dashboard", Some(&expired), NOW),
            GuardDecision::Redirect("/login?redirect=/dashboard".to_string())
        );
    }

    #[test]
    fn test_expiry_equal_to_now_is_invalid() {
        let edge = token(serde_json::json!({"role": "MEMBER", "exp": NOW}));
        assert!(valid_session(Some(&edge), NOW).is_none());
        assert!(valid_session(Some(&edge), NOW - 1).is_some());
    }

    #[test]
    fn test_fractional_expiry_keeps_session() {
        let live = token(serde_json::json!({"role": "ADMIN", "exp": NOW as f64 + 0.5}));
        assert_eq!(evaluate("/admin", Some(&live), NOW), GuardDecision::Allow);
        assert_eq!(
            evaluate("/admin", Some(&live), NOW + 1),
            GuardDecision::Redirect("/login?redirect=/admin".to_string())
        );
    }

    #[test]
    fn test_missing_session_preserves_nested_path() {
        assert_eq!(
            evaluate("/categories/planners", None, NOW),
            GuardDecision::Redirect("/login?redirect=/categories/planners".to_string())
        );
    }

    #[test]
    fn test_unparseable_token_is_absent() {
        assert_eq!(
            evaluate("/perfil", Some("garbage"), NOW),
            GuardDecision::Redirect("/login?redirect=/perfil".to_string())
        );
        assert_eq!(evaluate("/login", Some("garbage"), NOW), GuardDecision::Allow);
        assert_eq!(
            evaluate("/suporte", Some(""), NOW),
            GuardDecision::Redirect("/login?redirect=/suporte".to_string())
        );
    }

    #[test]
    fn test_admin_routes_by_role() {
        let admin = token(serde_json::json!({"role": "ADMIN", "exp": NOW + 60}));
        let member = token(serde_json::json!({"role": "MEMBER", "exp": NOW + 60}));
        let unknown = token(serde_json::json!({"role": "SUPPORT"}));

        assert_eq!(evaluate("/admin", Some(&admin), NOW), GuardDecision::Allow);
        assert_eq!(
            evaluate("/admin", Some(&member), NOW),
            GuardDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(
            evaluate("/admin/users", Some(&unknown), NOW),
            GuardDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(
            evaluate("/admin", None, NOW),
            GuardDecision::Redirect("/login?redirect=/admin".to_string())
        );
    }

    #[test]
    fn test_auth_routes_with_session() {
        let member = token(serde_json::json!({"role": "MEMBER"}));
        assert_eq!(
            evaluate("/login", Some(&member), NOW),
            GuardDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(
            evaluate("/register", Some(&member), NOW),
            GuardDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(evaluate("/login", None, NOW), GuardDecision::Allow);
    }

    #[test]
    fn test_public_paths_always_allowed() {
        assert_eq!(evaluate("/", None, NOW), GuardDecision::Allow);
        assert_eq!(evaluate("/planner-tutorial", Some("x"), NOW), GuardDecision::Allow);
    }

    #[test]
    fn test_login_redirect_encodes_segments() {
        assert_eq!(
            login_redirect("/categories/café da manhã"),
            "/login?redirect=/categories/caf%C3%A9%20da%20manh%C3%A3"
        );
        assert_eq!(
            login_redirect("/categories/caf%C3%A9%20da%20manh%C3%A3"),
            "/login?redirect=/categories/caf%C3%A9%20da%20manh%C3%A3"
        );
    }

    #[test]
    fn test_excluded_paths() {
        assert!(is_excluded("/api/upload"));
        assert!(is_excluded("/_next/static/chunk.js"));
        assert!(is_excluded("/favicon.ico"));
        assert!(is_excluded("/images/Logo.PNG"));
        assert!(is_excluded("/session/login"));
        assert!(!is_excluded("/dashboard"));
        assert!(!is_excluded("/apiary"));
    }
}
