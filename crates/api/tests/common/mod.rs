#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tenderhub_api::config::{LogFormat, ServerConfig};
use tenderhub_api::router::build_app_router;
use tenderhub_api::state::AppState;
use tenderhub_core::types::DbId;
use tenderhub_db::MemoryStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "postgres://unused".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 1,
        db_acquire_timeout_secs: 1,
        db_statement_timeout_ms: 1000,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router over the given store, with the same
/// middleware stack production uses.
pub fn build_test_app(store: MemoryStore) -> Router {
    let config = test_config();
    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Seeded data:
///
/// - `acme` with responsible employees `alice` and `bob`
/// - `globex` with responsible employee `carol`
/// - `dave`, an employee with no organization
pub struct Seed {
    pub store: MemoryStore,
    pub app: Router,
    pub acme: DbId,
    pub globex: DbId,
    pub carol: DbId,
    pub dave: DbId,
}

pub async fn seed() -> Seed {
    let store = MemoryStore::new();
    let acme = store.add_organization("Acme").await.id;
    let globex = store.add_organization("Globex").await.id;
    let alice = store.add_employee("alice").await.id;
    let bob = store.add_employee("bob").await.id;
    let carol = store.add_employee("carol").await.id;
    let dave = store.add_employee("dave").await.id;
    store.add_responsible(acme, alice).await;
    store.add_responsible(acme, bob).await;
    store.add_responsible(globex, carol).await;

    Seed {
        app: build_test_app(store.clone()),
        store,
        acme,
        globex,
        carol,
        dave,
    }
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: Router, uri: &str) -> Response {
    send(app, Method::PUT, uri, None).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::PATCH, uri, Some(body)).await
}

/// Send a raw, possibly malformed, JSON body.
pub async fn patch_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Create a tender owned by `acme` through the API and return its id.
pub async fn create_tender(seed: &Seed, name: &str, service_type: &str) -> String {
    let response = post_json(
        seed.app.clone(),
        "/api/tenders/new",
        serde_json::json!({
            "name": name,
            "description": format!("{name} description"),
            "serviceType": service_type,
            "organizationId": seed.acme,
            "creatorUsername": "alice",
        }),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

/// Create and publish a tender owned by `acme`.
pub async fn published_tender(seed: &Seed, name: &str, service_type: &str) -> String {
    let id = create_tender(seed, name, service_type).await;
    let response = put(
        seed.app.clone(),
        &format!("/api/tenders/{id}/status?status=Published&username=alice"),
    )
    .await;
    assert_eq!(response.status(), 200);
    id
}

/// Create a bid by `globex` on `tender_id` and return its id.
pub async fn globex_bid(seed: &Seed, tender_id: &str, name: &str) -> String {
    let response = post_json(
        seed.app.clone(),
        "/api/bids/new",
        serde_json::json!({
            "name": name,
            "description": "Fixed price",
            "tenderId": tender_id,
            "authorType": "Organization",
            "authorId": seed.globex,
        }),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["id"].as_str().unwrap().to_string()
}
