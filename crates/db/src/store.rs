//! The persistence seam used by the engines.
//!
//! [`Store`] covers single-statement reads and inserts. Anything that
//! snapshots and then mutates a live row goes through a [`StoreTx`] obtained
//! from [`Store::begin`]: the row is locked on read, every write joins the
//! same transaction, and nothing is visible to other requests until
//! [`StoreTx::commit`]. Dropping a `StoreTx` without committing discards all
//! of its writes.
//!
//! Two implementations exist: [`crate::PgStore`] for PostgreSQL and
//! [`crate::MemoryStore`] for tests.

use async_trait::async_trait;
use tenderhub_core::pagination::Page;
use tenderhub_core::types::DbId;

use crate::models::bid::{Bid, BidChanges, BidFilter, BidVersion, NewBid};
use crate::models::organization::Employee;
use crate::models::review::{BidReview, NewBidReview, ReviewFilter};
use crate::models::tender::{CreateTender, Tender, TenderChanges, TenderFilter, TenderVersion};

/// Errors raised by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The live row no longer holds the version the caller read.
    #[error("{entity} {id} is no longer at version {expected}")]
    VersionConflict {
        entity: &'static str,
        id: DbId,
        expected: i32,
    },

    /// The user already has an approving ballot on this bid.
    #[error("User {username} already voted on bid {bid_id}")]
    DuplicateBallot { bid_id: DbId, username: String },

    /// A row referenced inside a transaction disappeared.
    #[error("{entity} {id} vanished during the transaction")]
    Missing { entity: &'static str, id: DbId },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reads and single-step writes that need no row lock.
#[async_trait]
pub trait Store: Send + Sync {
    /// Open a transaction for a snapshot-then-mutate sequence.
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;

    // ── Identity and organizations ───────────────────────────────────

    async fn find_employee_by_username(&self, username: &str) -> StoreResult<Option<Employee>>;

    async fn find_employee_by_id(&self, id: DbId) -> StoreResult<Option<Employee>>;

    async fn organization_exists(&self, id: DbId) -> StoreResult<bool>;

    /// Whether `username` is on the responsible roster of `organization_id`.
    async fn is_responsible(&self, organization_id: DbId, username: &str) -> StoreResult<bool>;

    /// The organization the employee is responsible for, if any.
    async fn find_user_organization(&self, user_id: DbId) -> StoreResult<Option<DbId>>;

    // ── Tenders ──────────────────────────────────────────────────────

    async fn find_tender(&self, id: DbId) -> StoreResult<Option<Tender>>;

    async fn list_tenders(&self, filter: &TenderFilter, page: Page) -> StoreResult<Vec<Tender>>;

    /// Insert a tender with status `Created` and version 1.
    async fn create_tender(&self, input: &CreateTender) -> StoreResult<Tender>;

    async fn list_tender_versions(&self, tender_id: DbId) -> StoreResult<Vec<TenderVersion>>;

    // ── Bids ─────────────────────────────────────────────────────────

    async fn find_bid(&self, id: DbId) -> StoreResult<Option<Bid>>;

    async fn list_bids(&self, filter: &BidFilter, page: Page) -> StoreResult<Vec<Bid>>;

    /// Insert a bid with status `Created`, decision `None` and version 1.
    async fn create_bid(&self, input: &NewBid) -> StoreResult<Bid>;

    async fn list_bid_versions(&self, bid_id: DbId) -> StoreResult<Vec<BidVersion>>;

    async fn list_ballots(&self, bid_id: DbId) -> StoreResult<Vec<String>>;

    // ── Reviews ──────────────────────────────────────────────────────

    async fn create_review(&self, input: &NewBidReview) -> StoreResult<BidReview>;

    async fn list_reviews(&self, filter: &ReviewFilter, page: Page) -> StoreResult<Vec<BidReview>>;
}

/// One open transaction. Reads through `lock_*` hold the row until commit.
#[async_trait]
pub trait StoreTx: Send {
    async fn lock_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>>;

    async fn lock_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>>;

    /// Append a snapshot of `tender` at its current version.
    async fn snapshot_tender(&mut self, tender: &Tender) -> StoreResult<()>;

    /// Append a snapshot of `bid` at its current version.
    async fn snapshot_bid(&mut self, bid: &Bid) -> StoreResult<()>;

    async fn find_tender_version(
        &mut self,
        tender_id: DbId,
        version: i32,
    ) -> StoreResult<Option<TenderVersion>>;

    async fn find_bid_version(&mut self, bid_id: DbId, version: i32)
        -> StoreResult<Option<BidVersion>>;

    /// Apply `changes` and set `version = expected_version + 1`, but only if
    /// the row is still at `expected_version`.
    async fn update_tender(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &TenderChanges,
    ) -> StoreResult<Tender>;

    /// Bid counterpart of [`StoreTx::update_tender`].
    async fn update_bid(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &BidChanges,
    ) -> StoreResult<Bid>;

    async fn count_responsibles(&mut self, organization_id: DbId) -> StoreResult<i64>;

    async fn ballot_exists(&mut self, bid_id: DbId, username: &str) -> StoreResult<bool>;

    /// Record an approving vote. Fails with [`StoreError::DuplicateBallot`]
    /// if the user already voted on the bid.
    async fn insert_ballot(&mut self, bid_id: DbId, username: &str) -> StoreResult<()>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
