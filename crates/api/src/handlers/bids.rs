//! Handlers for bid endpoints, including the approval process.

use axum::extract::State;
use axum::Json;
use tenderhub_core::bid::BidStatus;
use tenderhub_core::types::DbId;
use tenderhub_db::models::bid::{Bid, CreateBid, UpdateBid};

use crate::engine::{bids, decision, rollback};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::{DecisionParams, StatusParams, UserListParams, UserParams};
use crate::state::AppState;

/// POST /api/bids/new
pub async fn create_bid(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBid>,
) -> AppResult<Json<Bid>> {
    let bid = bids::create_bid(state.store.as_ref(), input).await?;
    Ok(Json(bid))
}

/// GET /api/bids/my
pub async fn list_my_bids(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserListParams>,
) -> AppResult<Json<Vec<Bid>>> {
    let page = params.page.to_page()?;
    let bids = bids::list_user_bids(state.store.as_ref(), params.username.as_deref(), page).await?;
    Ok(Json(bids))
}

/// GET /api/bids/{tender_id}/list
pub async fn list_tender_bids(
    State(state): State<AppState>,
    AppPath(tender_id): AppPath<DbId>,
    AppQuery(params): AppQuery<UserListParams>,
) -> AppResult<Json<Vec<Bid>>> {
    let page = params.page.to_page()?;
    let bids = bids::list_tender_bids(
        state.store.as_ref(),
        tender_id,
        params.username.as_deref(),
        page,
    )
    .await?;
    Ok(Json(bids))
}

/// GET /api/bids/{id}/status
pub async fn get_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<UserParams>,
) -> AppResult<Json<BidStatus>> {
    let status = bids::bid_status(state.store.as_ref(), id, params.username.as_deref()).await?;
    Ok(Json(status))
}

/// PUT /api/bids/{id}/status
pub async fn edit_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<StatusParams>,
) -> AppResult<Json<Bid>> {
    let bid = bids::edit_bid_status(
        state.store.as_ref(),
        id,
        params.username.as_deref(),
        params.status.as_deref(),
    )
    .await?;
    Ok(Json(bid))
}

/// PATCH /api/bids/{id}/edit
pub async fn edit_bid(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<UserParams>,
    AppJson(input): AppJson<UpdateBid>,
) -> AppResult<Json<Bid>> {
    let bid = bids::edit_bid(state.store.as_ref(), id, params.username.as_deref(), input).await?;
    Ok(Json(bid))
}

/// PUT /api/bids/{id}/submit_decision
///
/// One evaluator's vote. The response reflects the bid after the vote,
/// including a status change when the decision became final.
pub async fn submit_decision(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<DecisionParams>,
) -> AppResult<Json<Bid>> {
    let bid = decision::submit_decision(
        state.store.as_ref(),
        id,
        params.username.as_deref(),
        params.decision.as_deref(),
    )
    .await?;
    Ok(Json(bid))
}

/// PUT /api/bids/{id}/rollback/{version}
pub async fn rollback_bid(
    State(state): State<AppState>,
    AppPath((id, version)): AppPath<(DbId, String)>,
    AppQuery(params): AppQuery<UserParams>,
) -> AppResult<Json<Bid>> {
    let bid = rollback::rollback_bid(state.store.as_ref(), id, &version, params.username.as_deref())
        .await?;
    Ok(Json(bid))
}
