//! Handlers for bid feedback.

use axum::extract::State;
use axum::Json;
use tenderhub_core::types::DbId;
use tenderhub_db::models::bid::Bid;
use tenderhub_db::models::review::BidReview;

use crate::engine::reviews;
use crate::error::AppResult;
use crate::extract::{AppPath, AppQuery};
use crate::query::{FeedbackParams, ReviewListParams};
use crate::state::AppState;

/// PUT /api/bids/{id}/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<FeedbackParams>,
) -> AppResult<Json<Bid>> {
    let bid = reviews::submit_feedback(
        state.store.as_ref(),
        id,
        params.username.as_deref(),
        params.bid_feedback.as_deref(),
    )
    .await?;
    Ok(Json(bid))
}

/// GET /api/bids/{tender_id}/reviews
///
/// Reviews the author received on other tenders, for the requester vetting
/// bids on `tender_id`.
pub async fn list_reviews(
    State(state): State<AppState>,
    AppPath(tender_id): AppPath<DbId>,
    AppQuery(params): AppQuery<ReviewListParams>,
) -> AppResult<Json<Vec<BidReview>>> {
    let page = params.page.to_page()?;
    let reviews = reviews::list_author_reviews(
        state.store.as_ref(),
        tender_id,
        params.author_username.as_deref(),
        params.requester_username.as_deref(),
        page,
    )
    .await?;
    Ok(Json(reviews))
}
