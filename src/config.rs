//! Application configuration loaded from environment variables.

use crate::services::api::DEFAULT_API_URL;
use crate::services::cooldown::DEFAULT_COOLDOWN_SECS;
use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream content API
    pub api_url: String,
    /// Server port
    pub port: u16,
    /// Mark the `auth_token` cookie `Secure` (off only for plain-http dev)
    pub cookie_secure: bool,
    /// Cooldown after a successful admin write, in seconds
    pub action_cooldown_secs: u32,
    /// Object storage origin serving thumbnails (allowed by the CSP)
    pub storage_url: Option<String>,
}

impl Config {
    /// Config for tests: local upstream and insecure cookies.
    pub fn test_default() -> Self {
        Self {
            api_url: "http://127.0.0.1:9".to_string(),
            port: 8080,
            cookie_secure: false,
            action_cooldown_secs: DEFAULT_COOLDOWN_SECS,
            storage_url: None,
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_url: env::var("API_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            port: parse_var("PORT", 8080)?,
            cookie_secure: parse_bool_var("COOKIE_SECURE", true)?,
            action_cooldown_secs: parse_var("ACTION_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS)?,
            storage_url: env::var("STORAGE_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_bool_var(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid(name, raw)),
        },
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
