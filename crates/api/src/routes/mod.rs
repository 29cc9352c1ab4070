pub mod bids;
pub mod tenders;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ping                                    liveness
///
/// /tenders                                 published tenders
/// /tenders/new                             create
/// /tenders/my                              tenders created by the caller
/// /tenders/{id}/status                     get, set status
/// /tenders/{id}/edit                       partial edit
/// /tenders/{id}/rollback/{version}         restore a snapshot
///
/// /bids/new                                create
/// /bids/my                                 bids authored by the caller
/// /bids/{id}/list                          bids on tender {id}
/// /bids/{id}/status                        get, set status
/// /bids/{id}/edit                          partial edit
/// /bids/{id}/submit_decision               approval vote
/// /bids/{id}/feedback                      leave a review
/// /bids/{id}/reviews                       author history for tender {id}
/// /bids/{id}/rollback/{version}            restore a snapshot
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(handlers::ping::ping))
        .nest("/tenders", tenders::router())
        .nest("/bids", bids::router())
}
