//! Rollback engine: restore a past snapshot as a new current version.
//!
//! The live row never goes back in version. Rolling back from version 3 to
//! version 1 copies the content of snapshot 1 and produces version 4, with
//! version 3 itself snapshotted first.

use tenderhub_core::error::CoreError;
use tenderhub_core::types::DbId;
use tenderhub_core::versioning::{parse_target_version, EntityKind};
use tenderhub_db::models::bid::{Bid, BidChanges};
use tenderhub_db::models::tender::{Tender, TenderChanges};
use tenderhub_db::Store;

use crate::engine::bids::authorize_bid;
use crate::engine::tenders::authorize_tender;
use crate::engine::versions::{lock_bid, lock_tender, revise_bid, revise_tender};
use crate::error::AppResult;

fn missing_version(kind: EntityKind, id: DbId, version: i32) -> CoreError {
    CoreError::not_found(kind.version_entity(), format!("{id} v{version}"))
}

pub async fn rollback_tender(
    store: &dyn Store,
    id: DbId,
    target: &str,
    username: Option<&str>,
) -> AppResult<Tender> {
    let (employee, _) = authorize_tender(store, id, username).await?;
    let target = parse_target_version(target)?;

    let mut tx = store.begin().await?;
    let current = lock_tender(tx.as_mut(), id).await?;
    let snapshot = tx
        .find_tender_version(id, target)
        .await?
        .ok_or_else(|| missing_version(EntityKind::Tender, id, target))?;
    let restored = revise_tender(
        tx.as_mut(),
        &current,
        &TenderChanges::restore(snapshot.content()),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        tender_id = %id,
        target,
        version = restored.version,
        user = %employee.username,
        "Tender rolled back"
    );
    Ok(restored)
}

/// Restore name, description and status. Decision state stays as it is.
pub async fn rollback_bid(
    store: &dyn Store,
    id: DbId,
    target: &str,
    username: Option<&str>,
) -> AppResult<Bid> {
    let (employee, _) = authorize_bid(store, id, username).await?;
    let target = parse_target_version(target)?;

    let mut tx = store.begin().await?;
    let current = lock_bid(tx.as_mut(), id).await?;
    let snapshot = tx
        .find_bid_version(id, target)
        .await?
        .ok_or_else(|| missing_version(EntityKind::Bid, id, target))?;
    let restored = revise_bid(tx.as_mut(), &current, &BidChanges::restore(snapshot.content())).await?;
    tx.commit().await?;

    tracing::info!(
        bid_id = %id,
        target,
        version = restored.version,
        user = %employee.username,
        "Bid rolled back"
    );
    Ok(restored)
}
