// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin console tests.
//!
//! These tests verify that:
//! 1. Admin writes carry the stored token and start a cooldown on success
//! 2. A second write is dropped while the first is in flight or cooling down
//! 3. Failed writes release the coordinator without a cooldown
//! 4. Dashboard totals survive a category whose videos fail to load

use noteplan_portal::models::{CategoryInput, ProductInput};
use noteplan_portal::services::admin::{CATEGORIES_ACTION, PRODUCTS_ACTION};
use noteplan_portal::services::{
    AdminConsole, AdminError, ApiClient, ApiError, CooldownCoordinator, MemoryStore,
    SessionStore, StartOutcome,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn console(api_url: &str, cooldown_secs: u32) -> (AdminConsole, CooldownCoordinator) {
    let session = SessionStore::new(Arc::new(MemoryStore::new()), false);
    session
        .set_session(&common::create_test_token("ADMIN", 3600))
        .unwrap();
    let cooldown = CooldownCoordinator::new();
    let console = AdminConsole::new(
        ApiClient::new(api_url),
        session,
        cooldown.clone(),
        cooldown_secs,
    );
    (console, cooldown)
}

fn category() -> CategoryInput {
    CategoryInput {
        name: "Planners".to_string(),
        description: "Tutoriais de planners".to_string(),
        is_active: true,
        sort_order: 1,
    }
}

fn product() -> ProductInput {
    ProductInput {
        name: "Planner 2026".to_string(),
        slug: "planner-2026".to_string(),
        description: None,
        price: Some(97.0),
        stripe_product_id: None,
        stripe_price_id: None,
        is_active: true,
    }
}

#[tokio::test]
async fn test_write_starts_cooldown_and_blocks_next_write() {
    let server = MockServer::start().await;
    let token = common::create_test_token("ADMIN", 3600);

    Mock::given(method("POST"))
        .and(path("/v1/categories"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/products"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (console, cooldown) = console(&server.uri(), 3);

    let outcome = console.create_category(&category()).await.unwrap();
    assert_eq!(outcome, StartOutcome::Completed);

    let state = cooldown.state();
    assert!(!state.is_loading);
    assert_eq!(state.cooldown_seconds, 3);
    assert_eq!(state.action_id.as_deref(), Some(CATEGORIES_ACTION));

    // Different panel, same coordinator: still dropped
    let outcome = console.create_product(&product()).await.unwrap();
    match &outcome {
        StartOutcome::CoolingDown {
            action_id,
            remaining,
        } => {
            assert_eq!(action_id, CATEGORIES_ACTION);
            assert!(*remaining >= 1);
        }
        other => panic!("expected cooldown, got {other:?}"),
    }
    assert!(outcome.wait_notice().unwrap().starts_with("Por favor, aguarde"));
}

#[tokio::test]
async fn test_cooldown_expires() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/products/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let (console, cooldown) = console(&server.uri(), 1);

    assert_eq!(
        console.delete_product("p1").await.unwrap(),
        StartOutcome::Completed
    );
    assert_eq!(cooldown.state().action_id.as_deref(), Some(PRODUCTS_ACTION));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(cooldown.state().is_idle());

    assert_eq!(
        console.delete_product("p1").await.unwrap(),
        StartOutcome::Completed
    );
}

#[tokio::test]
async fn test_concurrent_writes_single_flight() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/categories/planners"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let (console, _) = console(&server.uri(), 3);
    let input = category();

    let (first, second) = tokio::join!(
        console.update_category("planners", &input),
        console.update_category("planners", &input),
    );

    let mut outcomes = vec![first.unwrap(), second.unwrap()];
    outcomes.sort_by_key(|o| o.was_dropped());
    assert_eq!(outcomes, vec![StartOutcome::Completed, StartOutcome::Busy]);
}

#[tokio::test]
async fn test_failed_write_releases_without_cooldown() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/categories/planners"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Categoria possui vídeos"})),
        )
        .mount(&server)
        .await;

    let (console, cooldown) = console(&server.uri(), 3);

    let err = console.delete_category("planners").await.unwrap_err();
    match err {
        AdminError::Api(ApiError::Http { message, .. }) => {
            assert_eq!(message, "Categoria possui vídeos")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(cooldown.state().is_idle());
}

#[tokio::test]
async fn test_missing_token_fails_write() {
    let cooldown = CooldownCoordinator::new();
    let console = AdminConsole::new(
        ApiClient::new("http://127.0.0.1:9"),
        SessionStore::new(Arc::new(MemoryStore::new()), false),
        cooldown.clone(),
        3,
    );

    let err = console.delete_user("user-7").await.unwrap_err();
    assert!(matches!(err, AdminError::MissingToken));
    assert_eq!(err.to_string(), "Token não encontrado");
    assert!(cooldown.state().is_idle());
}

#[tokio::test]
async fn test_dashboard_stats() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": "u1", "name": "Ana", "email": "ana@example.com", "role": "ADMIN"},
                {"id": "u2", "name": "Bia", "email": "bia@example.com", "role": "MEMBER"}
            ],
            "total": 57
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "c1", "name": "Planners", "slug": "planners"},
                {"id": "c2", "name": "Agendas", "slug": "agendas"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/categories/planners/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "category": null,
                "videos": [
                    {"id": "v1", "slug": "intro", "title": "Introdução"},
                    {"id": "v2", "slug": "capas", "title": "Capas"}
                ]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/categories/agendas/videos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (console, cooldown) = console(&server.uri(), 3);
    let stats = console.dashboard_stats().await.unwrap();

    assert_eq!(stats.total_users, 57);
    assert_eq!(stats.users.len(), 2);
    assert_eq!(stats.total_categories, 2);
    assert_eq!(stats.total_videos, 2);
    assert!(stats.videos.iter().all(|v| v.category_slug == "planners"));

    // Reads never touch the coordinator
    assert!(cooldown.state().is_idle());
}
