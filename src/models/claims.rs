// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token claims and membership roles.

use super::UserProfile;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Membership role carried in the `role` claim.
///
/// Any string the backend sends that is not one of the three known roles is
/// kept verbatim in `Unknown` so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Free,
    Member,
    Admin,
    Unknown(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Free => "FREE",
            Role::Member => "MEMBER",
            Role::Admin => "ADMIN",
            Role::Unknown(raw) => raw,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Role::Member)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Unknown(String::new())
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "FREE" => Role::Free,
            "MEMBER" => Role::Member,
            "ADMIN" => Role::Admin,
            _ => Role::Unknown(raw),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded payload segment of a session token.
///
/// The payload is kept whole so it re-serializes exactly as issued. Only
/// `role` and `exp` drive authorization decisions, and both are read through
/// accessors that tolerate whatever type the issuer put there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Role from the `role` claim. A non-string value is carried as its
    /// JSON text in `Role::Unknown`; a missing or null claim is the default.
    pub fn role(&self) -> Role {
        match self.0.get("role") {
            None | Some(Value::Null) => Role::default(),
            Some(Value::String(raw)) => Role::from(raw.as_str()),
            Some(other) => Role::Unknown(other.to_string()),
        }
    }

    /// Expiration time (Unix seconds, possibly fractional)
    pub fn exp(&self) -> Option<f64> {
        self.0.get("exp").and_then(Value::as_f64)
    }

    /// Expiration truncated to whole seconds.
    pub fn exp_secs(&self) -> Option<i64> {
        self.exp().map(|exp| exp.floor() as i64)
    }

    /// True when an `exp` claim is present and not strictly in the future.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp().is_some_and(|exp| exp <= now as f64)
    }

    /// Build the user profile the client keeps alongside the token.
    pub fn to_profile(&self) -> UserProfile {
        UserProfile {
            id: self
                .text_claim("id")
                .or_else(|| self.text_claim("userId"))
                .or_else(|| self.text_claim("sub")),
            name: self.text_claim("name"),
            email: self.text_claim("email"),
            role: self.role(),
            created_at: self.text_claim("createdAt"),
        }
    }

    /// String or numeric claim rendered as text.
    fn text_claim(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
