mod common;

use axum::http::StatusCode;
use common::{InMemoryStore, UnavailableLinks, make_app, test_server};
use link_shortener::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (server, store, _rx) = make_app();
    store.insert_link("one001", "https://example.com/", "alice");

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["database"]["message"], "Connected, 1 links");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (server, _store, _rx) = make_app();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("timestamp").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("click_queue").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let (server, _store, rx) = make_app();
    drop(rx);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_store_unavailable() {
    let (tx, _rx) = mpsc::channel(10);
    let state = AppState::new(
        Arc::new(UnavailableLinks),
        InMemoryStore::new(),
        common::InMemoryTokens::seeded(),
        tx,
        common::test_settings(),
    );
    let server = test_server(state);

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_redirect_with_unavailable_store_is_server_error() {
    let (tx, _rx) = mpsc::channel(10);
    let state = AppState::new(
        Arc::new(UnavailableLinks),
        InMemoryStore::new(),
        common::InMemoryTokens::seeded(),
        tx,
        common::test_settings(),
    );
    let server = test_server(state);

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "internal_error"
    );
}
