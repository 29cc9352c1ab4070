//! Version store helpers: lock, snapshot, then update with a version bump.
//!
//! Every user-driven mutation of a tender or bid goes through
//! [`revise_tender`] or [`revise_bid`], so each version increment has a
//! snapshot of the prior state recorded in the same transaction.

use tenderhub_core::error::CoreError;
use tenderhub_core::types::DbId;
use tenderhub_db::models::bid::{Bid, BidChanges};
use tenderhub_db::models::tender::{Tender, TenderChanges};
use tenderhub_db::StoreTx;

use crate::error::AppResult;

/// Re-read a tender under a row lock.
pub async fn lock_tender(tx: &mut dyn StoreTx, id: DbId) -> AppResult<Tender> {
    let tender = tx
        .lock_tender(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Tender", id))?;
    Ok(tender)
}

/// Re-read a bid under a row lock.
pub async fn lock_bid(tx: &mut dyn StoreTx, id: DbId) -> AppResult<Bid> {
    let bid = tx
        .lock_bid(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Bid", id))?;
    Ok(bid)
}

/// Snapshot `current` at its version, then apply `changes` as version + 1.
pub async fn revise_tender(
    tx: &mut dyn StoreTx,
    current: &Tender,
    changes: &TenderChanges,
) -> AppResult<Tender> {
    tx.snapshot_tender(current).await?;
    let updated = tx.update_tender(current.id, current.version, changes).await?;
    Ok(updated)
}

/// Snapshot `current` at its version, then apply `changes` as version + 1.
pub async fn revise_bid(tx: &mut dyn StoreTx, current: &Bid, changes: &BidChanges) -> AppResult<Bid> {
    tx.snapshot_bid(current).await?;
    let updated = tx.update_bid(current.id, current.version, changes).await?;
    Ok(updated)
}
