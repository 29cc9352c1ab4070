//! Repository for the `bid` table.

use sqlx::PgExecutor;
use tenderhub_core::pagination::Page;
use tenderhub_core::types::DbId;

use crate::models::bid::{Bid, BidChanges, BidFilter, NewBid};

const COLUMNS: &str = "id, name, description, status, tender_id, author_type, author_id, \
    organization_id, decision, approved_count, version, created_at, updated_at";

/// Provides CRUD operations for bids.
pub struct BidRepo;

impl BidRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewBid,
    ) -> Result<Bid, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid (name, description, tender_id, author_type, author_id, organization_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bid>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.tender_id)
            .bind(input.author_type.as_str())
            .bind(input.author_id)
            .bind(input.organization_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bid WHERE id = $1");
        sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Read a bid and hold a row lock until the transaction ends.
    pub async fn find_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bid WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List bids matching `filter`, ordered by name ascending.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        filter: &BidFilter,
        page: Page,
    ) -> Result<Vec<Bid>, sqlx::Error> {
        match filter {
            BidFilter::AuthoredBy { author_id } => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bid
                     WHERE author_id = $1
                     ORDER BY name ASC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Bid>(&query)
                    .bind(author_id)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(executor)
                    .await
            }
            BidFilter::OnTender {
                tender_id,
                organization_id,
            } => {
                let query = format!(
                    "SELECT {COLUMNS} FROM bid
                     WHERE tender_id = $1
                       AND (status = 'Published' OR organization_id = $2)
                     ORDER BY name ASC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Bid>(&query)
                    .bind(tender_id)
                    .bind(organization_id)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(executor)
                    .await
            }
        }
    }

    /// Apply `changes` and bump the version, if the row is still at
    /// `expected_version`. Returns `None` when the compare-and-swap misses.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        expected_version: i32,
        changes: &BidChanges,
    ) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!(
            "UPDATE bid SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                decision = COALESCE($6, decision),
                approved_count = COALESCE($7, approved_count),
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bid>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.decision.map(|d| d.as_str()))
            .bind(changes.approved_count)
            .fetch_optional(executor)
            .await
    }
}
