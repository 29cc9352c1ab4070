//! Liveness endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, body_text, get, seed};
use tower::ServiceExt;

#[tokio::test]
async fn ping_returns_ok() {
    let seed = seed().await;
    let response = get(seed.app, "/api/ping").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let seed = seed().await;
    let response = get(seed.app, "/api/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let seed = seed().await;
    let response = get(seed.app, "/api/ping").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let seed = seed().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/tenders")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "PATCH")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = seed.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn caller_request_id_is_echoed_back() {
    let seed = seed().await;
    let request = Request::builder()
        .uri("/api/ping")
        .header("x-request-id", "tender-trace-1")
        .body(Body::empty())
        .unwrap();
    let response = seed.app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "tender-trace-1"
    );
}

#[tokio::test]
async fn api_errors_carry_a_reason_body() {
    let seed = seed().await;
    let response = get(seed.app, "/api/tenders/my").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["reason"], "No user provided");
}
