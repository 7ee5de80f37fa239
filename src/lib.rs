// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! NotePlan Portal: session and authorization core of the membership
//! video portal.
//!
//! This crate provides the token codec, session store, route guards,
//! admin action cooldowns and the content API client, plus the edge
//! server that guards page navigation.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use dashmap::DashMap;
use services::storage::{MemoryStore, StorageError};
use services::{ApiClient, CooldownCoordinator, SessionStore};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    /// Login/registration coordinators keyed by normalized email
    auth_cooldowns: DashMap<String, CooldownCoordinator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let api = ApiClient::new(config.api_url.clone());
        Self {
            config,
            api,
            auth_cooldowns: DashMap::new(),
        }
    }

    /// Coordinator for the auth forms of one account.
    ///
    /// Duplicate submits for the same email are dropped while unrelated
    /// accounts never wait on each other. Idle coordinators are pruned.
    pub fn auth_cooldown(&self, email: &str) -> CooldownCoordinator {
        let key = email.trim().to_lowercase();
        self.auth_cooldowns
            .retain(|k, coordinator| *k == key || !coordinator.state().is_idle());
        self.auth_cooldowns.entry(key).or_default().clone()
    }

    /// Session store for one request, holding the token from the
    /// `auth_token` cookie if the browser sent one.
    pub fn request_session(&self, token: Option<&str>) -> Result<SessionStore, StorageError> {
        let session = SessionStore::new(Arc::new(MemoryStore::new()), self.config.cookie_secure);
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            session.set_session(token)?;
        }
        Ok(session)
    }
}
