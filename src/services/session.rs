// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client session store.
//!
//! Persists the raw token under `auth_token` and the decoded profile under
//! `user_data`, and produces the `auth_token` cookie the edge guard reads.
//! Token and profile are written independently; a reader may briefly see one
//! updated without the other.

use crate::models::UserProfile;
use crate::services::storage::{KeyValueStore, StorageError};
use crate::services::token::decode_claims;
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;

/// Storage key (and cookie name) for the raw session token.
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key for the JSON-serialized user profile.
pub const USER_KEY: &str = "user_data";
/// Lifetime of the mirrored token cookie.
pub const COOKIE_TTL_DAYS: i64 = 7;

/// Build the `auth_token` cookie mirroring `token`.
///
/// Never `HttpOnly`: the cookie is written from the client side of the
/// session, where that flag cannot be set.
pub fn token_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_KEY, token.to_string()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(COOKIE_TTL_DAYS))
        .build()
}

/// Build the cookie that deletes `auth_token`.
pub fn token_removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_KEY, ""))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .expires(time::OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Session store over an injected key-value backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: Option<Arc<dyn KeyValueStore>>,
    cookie_secure: bool,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, cookie_secure: bool) -> Self {
        Self {
            storage: Some(storage),
            cookie_secure,
        }
    }

    /// A store with nothing behind it: reads yield `None`, writes are
    /// dropped, cookies are still produced.
    pub fn detached(cookie_secure: bool) -> Self {
        Self {
            storage: None,
            cookie_secure,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    /// Store a freshly issued token and its decoded profile.
    ///
    /// A token whose claims cannot be decoded is still stored; only the
    /// profile write is skipped. Returns the cookie to mirror to the browser.
    pub fn set_session(&self, token: &str) -> Result<Cookie<'static>, StorageError> {
        if let Some(storage) = &self.storage {
            storage.set(TOKEN_KEY, token)?;

            match decode_claims(token) {
                Some(claims) => {
                    let profile = claims.to_profile();
                    storage.set(USER_KEY, &serde_json::to_string(&profile)?)?;
                    tracing::debug!(role = %profile.role, "Session stored");
                }
                None => {
                    tracing::warn!("Stored session token has no readable claims");
                }
            }
        }

        Ok(token_cookie(token, self.cookie_secure))
    }

    /// Replace the stored profile without touching the token.
    pub fn set_user(&self, profile: &UserProfile) -> Result<(), StorageError> {
        if let Some(storage) = &self.storage {
            storage.set(USER_KEY, &serde_json::to_string(profile)?)?;
        }
        Ok(())
    }

    pub fn get_token(&self) -> Option<String> {
        self.storage.as_ref()?.get(TOKEN_KEY)
    }

    pub fn get_user(&self) -> Option<UserProfile> {
        let raw = self.storage.as_ref()?.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored profile");
                None
            }
        }
    }

    /// Forget token and profile. Returns the cookie that deletes the mirror.
    pub fn clear_session(&self) -> Result<Cookie<'static>, StorageError> {
        if let Some(storage) = &self.storage {
            storage.remove(TOKEN_KEY)?;
            storage.remove(USER_KEY)?;
        }
        Ok(token_removal_cookie(self.cookie_secure))
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("attached", &self.is_attached())
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}
