//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values and check the
//! status code and the `{"reason": ...}` body.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use tenderhub_api::error::AppError;
use tenderhub_core::error::CoreError;
use tenderhub_db::StoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_names_entity_and_id() {
    let (status, json) = error_to_response(CoreError::not_found("Tender", "abc").into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["reason"], "Tender with id abc not found");
}

#[tokio::test]
async fn identity_and_rights_errors() {
    let (status, json) =
        error_to_response(CoreError::Unauthorized("No user provided".into()).into()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["reason"], "No user provided");

    let (status, json) =
        error_to_response(CoreError::Forbidden("Don't have rights".into()).into()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["reason"], "Don't have rights");
}

#[tokio::test]
async fn validation_and_bad_request_are_400() {
    let (status, json) =
        error_to_response(CoreError::Validation("No decision provided".into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["reason"], "No decision provided");

    let (status, json) = error_to_response(AppError::BadRequest("Can't unmarshal".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["reason"], "Can't unmarshal");
}

#[tokio::test]
async fn duplicate_ballot_is_404() {
    let err = StoreError::DuplicateBallot {
        bid_id: uuid::Uuid::new_v4(),
        username: "alice".into(),
    };
    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["reason"], "Bid already approved by user");
}

#[tokio::test]
async fn version_conflict_is_409() {
    let err = StoreError::VersionConflict {
        entity: "Bid",
        id: uuid::Uuid::new_v4(),
        expected: 3,
    };
    let (status, _) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn database_errors_are_sanitized() {
    let err = StoreError::Database(sqlx::Error::PoolTimedOut);
    let (status, json) = error_to_response(err.into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["reason"], "An internal error occurred");
}
