//! Feedback on bids and the review history of bid authors.

use tenderhub_core::bid::validate_feedback;
use tenderhub_core::error::CoreError;
use tenderhub_core::pagination::Page;
use tenderhub_core::types::DbId;
use tenderhub_db::models::bid::Bid;
use tenderhub_db::models::organization::Employee;
use tenderhub_db::models::review::{BidReview, NewBidReview, ReviewFilter};
use tenderhub_db::Store;

use crate::engine::bids::find_bid;
use crate::engine::gate::{ensure_responsible, identify};
use crate::engine::tenders::find_tender;
use crate::error::AppResult;

/// Leave feedback on a bid as an evaluator of its tender.
pub async fn submit_feedback(
    store: &dyn Store,
    bid_id: DbId,
    username: Option<&str>,
    feedback: Option<&str>,
) -> AppResult<Bid> {
    let employee = identify(store, username).await?;
    let bid = find_bid(store, bid_id).await?;
    let tender = find_tender(store, bid.tender_id).await?;
    ensure_responsible(store, tender.organization_id, &employee.username).await?;

    let feedback = feedback.unwrap_or_default();
    validate_feedback(feedback)?;

    let review = store
        .create_review(&NewBidReview {
            bid_id,
            username: employee.username,
            review: feedback.to_string(),
        })
        .await?;
    tracing::info!(bid_id = %bid_id, review_id = %review.id, "Feedback recorded");
    Ok(bid)
}

async fn identify_role(
    store: &dyn Store,
    username: Option<&str>,
    role: &str,
) -> AppResult<Employee> {
    if username.map_or(true, str::is_empty) {
        return Err(CoreError::Unauthorized(format!("No {role} provided")).into());
    }
    identify(store, username).await
}

/// Reviews on bids the author submitted for tenders other than `tender_id`.
///
/// The requester must be responsible for the organization owning
/// `tender_id`: they are vetting the author's history for their own tender.
pub async fn list_author_reviews(
    store: &dyn Store,
    tender_id: DbId,
    author_username: Option<&str>,
    requester_username: Option<&str>,
    page: Page,
) -> AppResult<Vec<BidReview>> {
    let author = identify_role(store, author_username, "author").await?;
    let requester = identify_role(store, requester_username, "requester").await?;
    let tender = find_tender(store, tender_id).await?;
    ensure_responsible(store, tender.organization_id, &requester.username).await?;

    let filter = ReviewFilter {
        author_id: author.id,
        exclude_tender_id: tender_id,
    };
    Ok(store.list_reviews(&filter, page).await?)
}
