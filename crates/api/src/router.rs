//! HTTP surface of the procurement service.
//!
//! Everything lives under `/api`:
//!
//! - `/api/ping` answers liveness checks with a plain `ok`
//! - `/api/tenders/...` covers listing, creation, status, edits and rollback
//! - `/api/bids/...` covers bids, the quorum `submit_decision` vote,
//!   feedback and reviews
//!
//! Failures anywhere below the router are rendered by
//! [`AppError`](crate::error::AppError) as `{"reason": "..."}` bodies. The
//! binary and the integration tests both go through [`build_app_router`].

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID: &str = "x-request-id";

/// Mount the tender and bid route trees under `/api` and wrap them in the
/// service middleware.
///
/// Listed from the outermost layer inwards:
///
/// 1. CORS for the configured frontend origins
/// 2. A UUID `x-request-id` for requests that arrive without one
/// 3. One INFO span per request, carrying the request id
/// 4. The request id echoed back on the response
/// 5. `408 Request Timeout` once `request_timeout_secs` elapses, which
///    also aborts any store transaction the handler holds
/// 6. A handler panic turned into a bare 500
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);
    let timeout = Duration::from_secs(config.request_timeout_secs);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}

/// Tender and bid edits arrive as `PUT`/`PATCH` with JSON bodies, so only
/// those methods and `Content-Type` are allowed cross-origin.
///
/// A malformed origin in `CORS_ORIGINS` aborts startup.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<_> = origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{origin}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
