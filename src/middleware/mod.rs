// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (route guard, security headers).

pub mod edge_guard;
pub mod security;

pub use edge_guard::edge_guard;
