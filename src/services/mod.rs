// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod admin;
pub mod api;
pub mod auth;
pub mod client_guard;
pub mod cooldown;
pub mod session;
pub mod storage;
pub mod token;

pub use admin::{AdminConsole, AdminError, DashboardStats};
pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, AuthFlow, LoginForm, RegisterForm};
pub use client_guard::{ClientGuard, GuardView, Navigator};
pub use cooldown::{ActionHandle, CooldownCoordinator, CooldownState, StartOutcome};
pub use session::SessionStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use token::decode_claims;
