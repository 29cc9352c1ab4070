use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::tenders;
use crate::state::AppState;

/// Tender routes mounted at `/tenders`.
///
/// ```text
/// GET    /                          -> list_tenders
/// POST   /new                       -> create_tender
/// GET    /my                        -> list_my_tenders
/// GET    /{id}/status               -> get_status
/// PUT    /{id}/status               -> edit_status
/// PATCH  /{id}/edit                 -> edit_tender
/// PUT    /{id}/rollback/{version}   -> rollback_tender
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tenders::list_tenders))
        .route("/new", post(tenders::create_tender))
        .route("/my", get(tenders::list_my_tenders))
        .route(
            "/{id}/status",
            get(tenders::get_status).put(tenders::edit_status),
        )
        .route("/{id}/edit", patch(tenders::edit_tender))
        .route("/{id}/rollback/{version}", put(tenders::rollback_tender))
}
