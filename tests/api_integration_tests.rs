//! Integration Tests for the Admin API
//!
//! Tests the full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use housekeeper::api::create_router;
use housekeeper::clock::SystemClock;
use housekeeper::session::{InMemoryRegistry, Match, Player, Privileges, StatusCache};
use housekeeper::store::InMemoryStore;
use housekeeper::tasks::{StatusRefresh, TaskSpec};
use housekeeper::{AppState, Scheduler, Services};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_state() -> (Arc<InMemoryRegistry>, AppState) {
    let store = Arc::new(InMemoryStore::new());
    let registry = Arc::new(InMemoryRegistry::new(store.clone()));
    let services = Services {
        store,
        registry: registry.clone(),
        status: Arc::new(StatusCache::new()),
        clock: Arc::new(SystemClock),
    };
    (registry, AppState::new(Arc::new(Scheduler::new()), services))
}

fn create_test_app() -> Router {
    create_router(create_state().1)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get(create_test_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == TASKS Endpoint Tests ==

#[tokio::test]
async fn test_tasks_endpoint_before_initialize() {
    let (status, json) = get(create_test_app(), "/tasks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 0);
    assert!(json["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_tasks_endpoint_reports_stats() {
    let (_, state) = create_state();
    state
        .scheduler
        .initialize(vec![TaskSpec::new(
            Arc::new(StatusRefresh::new(&state.services)),
            Duration::from_millis(10),
        )
        .run_immediately()])
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    let (status, json) = get(create_router(state.clone()), "/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["running"], 1);

    let task = &json["tasks"][0];
    assert_eq!(task["name"], "status-refresh");
    assert_eq!(task["interval_ms"], 10);
    assert!(task["ticks"].as_u64().unwrap() >= 1);
    assert!(task["last_tick"].is_string());

    state.scheduler.shutdown().await;
}

// == STATUS Endpoint Tests ==

#[tokio::test]
async fn test_status_endpoint_is_cached() {
    let (registry, state) = create_state();
    let app = create_router(state.clone());
    registry
        .add_player(Player::connected(1, "a", Privileges::NORMAL, Utc::now()))
        .await;
    registry
        .add_match(Match::new(1, "m", 8, false, Utc::now()))
        .await;

    let (status, first) = get(app.clone(), "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["online_players"], 1);
    assert_eq!(first["active_matches"], 1);

    registry
        .add_player(Player::connected(2, "b", Privileges::NORMAL, Utc::now()))
        .await;
    let (_, cached) = get(app.clone(), "/status").await;
    assert_eq!(cached["online_players"], 1);
    assert_eq!(cached["generated_at"], first["generated_at"]);

    state.services.status.clear().await;
    let (_, fresh) = get(app, "/status").await;
    assert_eq!(fresh["online_players"], 2);
}

// == Live Server ==

#[tokio::test]
async fn test_served_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, create_test_app()).await.unwrap();
    });

    let json: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "healthy");

    let response = reqwest::get(format!("http://{}/missing", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    server.abort();
}
