//! Repository for the `bid_approve` ballot table.
//!
//! One row per approving vote. `uq_bid_approve` on `(bid_id, username)`
//! makes a second vote by the same user fail at insert time.

use sqlx::PgExecutor;
use tenderhub_core::types::DbId;

use crate::models::bid::BidApprove;

const COLUMNS: &str = "id, bid_id, username, created_at";

/// Name of the unique constraint guarding one ballot per user and bid.
pub const UNIQUE_BALLOT_CONSTRAINT: &str = "uq_bid_approve";

pub struct BidApproveRepo;

impl BidApproveRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        bid_id: DbId,
        username: &str,
    ) -> Result<BidApprove, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid_approve (bid_id, username)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidApprove>(&query)
            .bind(bid_id)
            .bind(username)
            .fetch_one(executor)
            .await
    }

    pub async fn exists<'e>(
        executor: impl PgExecutor<'e>,
        bid_id: DbId,
        username: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM bid_approve WHERE bid_id = $1 AND username = $2)",
        )
        .bind(bid_id)
        .bind(username)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Usernames that voted on the bid, in voting order.
    pub async fn list_usernames<'e>(
        executor: impl PgExecutor<'e>,
        bid_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT username FROM bid_approve WHERE bid_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(bid_id)
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}

/// Whether `err` is the duplicate-ballot unique violation.
pub fn is_duplicate_ballot(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(UNIQUE_BALLOT_CONSTRAINT)
        }
        _ => false,
    }
}
