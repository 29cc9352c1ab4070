//! Bid review (feedback) model.

use serde::Serialize;
use sqlx::FromRow;
use tenderhub_core::types::{DbId, Timestamp};

/// A row from the `bid_review` table, as exposed to clients.
///
/// The review text is published under `description`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidReview {
    pub id: DbId,
    #[serde(skip)]
    pub bid_id: DbId,
    #[serde(skip)]
    pub username: String,
    #[serde(rename = "description")]
    pub review: String,
    pub created_at: Timestamp,
}

/// A review ready to insert.
#[derive(Debug, Clone)]
pub struct NewBidReview {
    pub bid_id: DbId,
    pub username: String,
    pub review: String,
}

/// Reviews left on bids authored by `author_id`, excluding those on
/// `exclude_tender_id`. Ordered newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewFilter {
    pub author_id: DbId,
    pub exclude_tender_id: DbId,
}
