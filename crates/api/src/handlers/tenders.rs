//! Handlers for tender endpoints.

use axum::extract::State;
use axum::Json;
use tenderhub_core::tender::TenderStatus;
use tenderhub_core::types::DbId;
use tenderhub_db::models::tender::{CreateTender, Tender, UpdateTender};

use crate::engine::{rollback, tenders};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::{StatusParams, TenderListParams, UserListParams, UserParams};
use crate::state::AppState;

/// GET /api/tenders
///
/// Published tenders, optionally filtered by `service_type`.
pub async fn list_tenders(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TenderListParams>,
) -> AppResult<Json<Vec<Tender>>> {
    let page = params.page.to_page()?;
    let tenders = tenders::list_tenders(state.store.as_ref(), params.service_type, page).await?;
    Ok(Json(tenders))
}

/// POST /api/tenders/new
pub async fn create_tender(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTender>,
) -> AppResult<Json<Tender>> {
    let tender = tenders::create_tender(state.store.as_ref(), input).await?;
    Ok(Json(tender))
}

/// GET /api/tenders/my
pub async fn list_my_tenders(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<UserListParams>,
) -> AppResult<Json<Vec<Tender>>> {
    let page = params.page.to_page()?;
    let tenders =
        tenders::list_user_tenders(state.store.as_ref(), params.username.as_deref(), page).await?;
    Ok(Json(tenders))
}

/// GET /api/tenders/{id}/status
pub async fn get_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<UserParams>,
) -> AppResult<Json<TenderStatus>> {
    let status = tenders::tender_status(state.store.as_ref(), id, params.username.as_deref()).await?;
    Ok(Json(status))
}

/// PUT /api/tenders/{id}/status
pub async fn edit_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<StatusParams>,
) -> AppResult<Json<Tender>> {
    let tender = tenders::edit_tender_status(
        state.store.as_ref(),
        id,
        params.username.as_deref(),
        params.status.as_deref(),
    )
    .await?;
    Ok(Json(tender))
}

/// PATCH /api/tenders/{id}/edit
pub async fn edit_tender(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppQuery(params): AppQuery<UserParams>,
    AppJson(input): AppJson<UpdateTender>,
) -> AppResult<Json<Tender>> {
    let tender =
        tenders::edit_tender(state.store.as_ref(), id, params.username.as_deref(), input).await?;
    Ok(Json(tender))
}

/// PUT /api/tenders/{id}/rollback/{version}
pub async fn rollback_tender(
    State(state): State<AppState>,
    AppPath((id, version)): AppPath<(DbId, String)>,
    AppQuery(params): AppQuery<UserParams>,
) -> AppResult<Json<Tender>> {
    let tender =
        rollback::rollback_tender(state.store.as_ref(), id, &version, params.username.as_deref())
            .await?;
    Ok(Json(tender))
}
