// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! NotePlan Portal edge server
//!
//! Guards page navigation for the membership video portal and brokers
//! login, registration and logout against the content API.

use noteplan_portal::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        api_url = %config.api_url,
        cookie_secure = config.cookie_secure,
        "Starting NotePlan Portal"
    );
    if !config.cookie_secure {
        tracing::warn!("COOKIE_SECURE is off; session cookies will be sent over plain http");
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone()));

    // Build router
    let app = noteplan_portal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("noteplan_portal=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
