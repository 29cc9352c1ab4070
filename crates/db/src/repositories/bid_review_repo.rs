//! Repository for the `bid_review` table.

use sqlx::PgExecutor;
use tenderhub_core::pagination::Page;

use crate::models::review::{BidReview, NewBidReview, ReviewFilter};

const COLUMNS: &str = "id, bid_id, username, review, created_at";

pub struct BidReviewRepo;

impl BidReviewRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewBidReview,
    ) -> Result<BidReview, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid_review (bid_id, username, review)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidReview>(&query)
            .bind(input.bid_id)
            .bind(&input.username)
            .bind(&input.review)
            .fetch_one(executor)
            .await
    }

    /// Reviews on bids the author submitted as a user, newest first.
    pub async fn list_for_author<'e>(
        executor: impl PgExecutor<'e>,
        filter: &ReviewFilter,
        page: Page,
    ) -> Result<Vec<BidReview>, sqlx::Error> {
        sqlx::query_as::<_, BidReview>(
            "SELECT r.id, r.bid_id, r.username, r.review, r.created_at
             FROM bid_review r
             JOIN bid b ON r.bid_id = b.id
             WHERE b.author_id = $1
               AND b.author_type = 'User'
               AND b.tender_id <> $2
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(filter.author_id)
        .bind(filter.exclude_tender_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(executor)
        .await
    }
}
