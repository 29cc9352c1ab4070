//! Quorum decision engine.
//!
//! Responsible employees of the tender's organization vote on a bid. One
//! rejection finalizes it. Approvals accumulate until the quorum of the
//! bid's organization is reached. A finalized bid is canceled and its
//! tender closed, all in one transaction.

use tenderhub_core::quorum::{ensure_open, plan, quorum_target, Verdict};
use tenderhub_core::tender::TenderStatus;
use tenderhub_core::types::DbId;
use tenderhub_db::models::bid::{Bid, BidChanges};
use tenderhub_db::models::tender::{Tender, TenderChanges};
use tenderhub_db::{Store, StoreError, StoreTx};

use crate::engine::bids::find_bid;
use crate::engine::gate::{ensure_responsible, identify};
use crate::engine::tenders::find_tender;
use crate::engine::versions::{lock_bid, lock_tender, revise_bid};
use crate::error::AppResult;

/// Record one vote on a bid and return the bid as it stands afterwards.
pub async fn submit_decision(
    store: &dyn Store,
    bid_id: DbId,
    username: Option<&str>,
    decision: Option<&str>,
) -> AppResult<Bid> {
    let employee = identify(store, username).await?;
    let bid = find_bid(store, bid_id).await?;
    let tender = find_tender(store, bid.tender_id).await?;
    ensure_responsible(store, tender.organization_id, &employee.username).await?;

    let mut tx = store.begin().await?;
    let current = lock_bid(tx.as_mut(), bid_id).await?;
    ensure_open(current.decision, current.status)?;
    let verdict = Verdict::parse_param(decision)?;

    let quorum = match verdict {
        Verdict::Rejected => 0,
        Verdict::Approved => {
            let responsibles = tx.count_responsibles(current.organization_id).await?;
            if tx.ballot_exists(bid_id, &employee.username).await? {
                return Err(StoreError::DuplicateBallot {
                    bid_id,
                    username: employee.username,
                }
                .into());
            }
            tx.insert_ballot(bid_id, &employee.username).await?;
            quorum_target(responsibles)
        }
    };

    let outcome = plan(verdict, current.approved_count, quorum);
    let changes = BidChanges {
        status: Some(outcome.status(current.status)),
        decision: Some(outcome.decision()),
        approved_count: Some(outcome.approved_count()),
        ..BidChanges::default()
    };
    let updated = revise_bid(tx.as_mut(), &current, &changes).await?;

    if outcome.is_final() {
        let closed = close_tender(tx.as_mut(), current.tender_id).await?;
        tx.commit().await?;
        tracing::info!(
            bid_id = %bid_id,
            tender_id = %closed.id,
            decision = %outcome.decision(),
            approved_count = updated.approved_count,
            user = %employee.username,
            "Bid decision finalized, tender closed"
        );
    } else {
        tx.commit().await?;
        tracing::info!(
            bid_id = %bid_id,
            %verdict,
            approved_count = updated.approved_count,
            quorum,
            user = %employee.username,
            "Approval recorded"
        );
    }

    Ok(updated)
}

/// Move a tender to `Closed` with a version bump.
///
/// No snapshot is written here, so this is the one version increment
/// without a matching `tender_version` row.
async fn close_tender(tx: &mut dyn StoreTx, tender_id: DbId) -> AppResult<Tender> {
    let tender = lock_tender(tx, tender_id).await?;
    let closed = tx
        .update_tender(
            tender.id,
            tender.version,
            &TenderChanges::status(TenderStatus::Closed),
        )
        .await?;
    Ok(closed)
}
