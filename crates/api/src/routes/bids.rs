use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{bids, reviews};
use crate::state::AppState;

/// Bid routes mounted at `/bids`.
///
/// The listing routes take a tender id in the `{id}` position.
///
/// ```text
/// POST   /new                       -> create_bid
/// GET    /my                        -> list_my_bids
/// GET    /{id}/list                 -> list_tender_bids
/// GET    /{id}/status               -> get_status
/// PUT    /{id}/status               -> edit_status
/// PATCH  /{id}/edit                 -> edit_bid
/// PUT    /{id}/submit_decision      -> submit_decision
/// PUT    /{id}/feedback             -> submit_feedback
/// GET    /{id}/reviews              -> list_reviews
/// PUT    /{id}/rollback/{version}   -> rollback_bid
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", post(bids::create_bid))
        .route("/my", get(bids::list_my_bids))
        .route("/{id}/list", get(bids::list_tender_bids))
        .route("/{id}/status", get(bids::get_status).put(bids::edit_status))
        .route("/{id}/edit", patch(bids::edit_bid))
        .route("/{id}/submit_decision", put(bids::submit_decision))
        .route("/{id}/feedback", put(reviews::submit_feedback))
        .route("/{id}/reviews", get(reviews::list_reviews))
        .route("/{id}/rollback/{version}", put(bids::rollback_bid))
}
