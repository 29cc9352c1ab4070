use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tenderhub_core::error::CoreError;
use tenderhub_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// errors, plus request-body rejections. Every response body has the
/// shape `{"reason": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tenderhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from `tenderhub_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(format!("Invalid request body: {errors}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, axum::Json(json!({ "reason": reason }))).into_response()
    }
}

/// Classify a store error into an HTTP status and message.
///
/// - A duplicate approving ballot maps to 404.
/// - A lost compare-and-swap maps to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, String) {
    match err {
        StoreError::DuplicateBallot { .. } => (
            StatusCode::NOT_FOUND,
            "Bid already approved by user".to_string(),
        ),
        StoreError::VersionConflict { entity, id, .. } => (
            StatusCode::CONFLICT,
            format!("{entity} {id} was modified concurrently, retry the request"),
        ),
        StoreError::Missing { entity, id } => (
            StatusCode::NOT_FOUND,
            format!("{entity} with id {id} not found"),
        ),
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred".to_string(),
    )
}
