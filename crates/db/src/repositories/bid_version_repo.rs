//! Repository for the `bid_version` snapshot table (append-only).

use sqlx::PgExecutor;
use tenderhub_core::types::DbId;

use crate::models::bid::{Bid, BidVersion};

const COLUMNS: &str =
    "id, bid_id, version, name, description, status, decision, approved_count, created_at";

pub struct BidVersionRepo;

impl BidVersionRepo {
    /// Record `bid` as it stands, tagged with its current version.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        bid: &Bid,
    ) -> Result<BidVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid_version (bid_id, version, name, description, status, decision, approved_count)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid.id)
            .bind(bid.version)
            .bind(&bid.name)
            .bind(&bid.description)
            .bind(bid.status.as_str())
            .bind(bid.decision.as_str())
            .bind(bid.approved_count)
            .fetch_one(executor)
            .await
    }

    pub async fn find<'e>(
        executor: impl PgExecutor<'e>,
        bid_id: DbId,
        version: i32,
    ) -> Result<Option<BidVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bid_version WHERE bid_id = $1 AND version = $2");
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .bind(version)
            .fetch_optional(executor)
            .await
    }

    /// All snapshots of a bid, oldest version first.
    pub async fn list_for_bid<'e>(
        executor: impl PgExecutor<'e>,
        bid_id: DbId,
    ) -> Result<Vec<BidVersion>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM bid_version WHERE bid_id = $1 ORDER BY version ASC");
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .fetch_all(executor)
            .await
    }
}
