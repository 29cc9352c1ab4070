//! PostgreSQL implementation of [`Store`].

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tenderhub_core::pagination::Page;
use tenderhub_core::types::DbId;

use crate::models::bid::{Bid, BidChanges, BidFilter, BidVersion, NewBid};
use crate::models::organization::Employee;
use crate::models::review::{BidReview, NewBidReview, ReviewFilter};
use crate::models::tender::{CreateTender, Tender, TenderChanges, TenderFilter, TenderVersion};
use crate::repositories::bid_approve_repo::is_duplicate_ballot;
use crate::repositories::{
    BidApproveRepo, BidRepo, BidReviewRepo, BidVersionRepo, EmployeeRepo, OrganizationRepo,
    TenderRepo, TenderVersionRepo,
};
use crate::store::{Store, StoreError, StoreResult, StoreTx};
use crate::DbPool;

/// A CAS update matched no row: someone else moved the version first.
fn version_conflict(entity: &'static str, id: DbId, expected: i32) -> StoreError {
    tracing::warn!(entity, %id, expected, "Version compare-and-swap missed");
    StoreError::VersionConflict {
        entity,
        id,
        expected,
    }
}

/// [`Store`] backed by a sqlx connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx }))
    }

    async fn find_employee_by_username(&self, username: &str) -> StoreResult<Option<Employee>> {
        Ok(EmployeeRepo::find_by_username(&self.pool, username).await?)
    }

    async fn find_employee_by_id(&self, id: DbId) -> StoreResult<Option<Employee>> {
        Ok(EmployeeRepo::find_by_id(&self.pool, id).await?)
    }

    async fn organization_exists(&self, id: DbId) -> StoreResult<bool> {
        Ok(OrganizationRepo::exists(&self.pool, id).await?)
    }

    async fn is_responsible(&self, organization_id: DbId, username: &str) -> StoreResult<bool> {
        Ok(OrganizationRepo::is_responsible(&self.pool, organization_id, username).await?)
    }

    async fn find_user_organization(&self, user_id: DbId) -> StoreResult<Option<DbId>> {
        Ok(OrganizationRepo::find_for_user(&self.pool, user_id).await?)
    }

    async fn find_tender(&self, id: DbId) -> StoreResult<Option<Tender>> {
        Ok(TenderRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_tenders(&self, filter: &TenderFilter, page: Page) -> StoreResult<Vec<Tender>> {
        Ok(TenderRepo::list(&self.pool, filter, page).await?)
    }

    async fn create_tender(&self, input: &CreateTender) -> StoreResult<Tender> {
        Ok(TenderRepo::create(&self.pool, input).await?)
    }

    async fn list_tender_versions(&self, tender_id: DbId) -> StoreResult<Vec<TenderVersion>> {
        Ok(TenderVersionRepo::list_for_tender(&self.pool, tender_id).await?)
    }

    async fn find_bid(&self, id: DbId) -> StoreResult<Option<Bid>> {
        Ok(BidRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_bids(&self, filter: &BidFilter, page: Page) -> StoreResult<Vec<Bid>> {
        Ok(BidRepo::list(&self.pool, filter, page).await?)
    }

    async fn create_bid(&self, input: &NewBid) -> StoreResult<Bid> {
        Ok(BidRepo::create(&self.pool, input).await?)
    }

    async fn list_bid_versions(&self, bid_id: DbId) -> StoreResult<Vec<BidVersion>> {
        Ok(BidVersionRepo::list_for_bid(&self.pool, bid_id).await?)
    }

    async fn list_ballots(&self, bid_id: DbId) -> StoreResult<Vec<String>> {
        Ok(BidApproveRepo::list_usernames(&self.pool, bid_id).await?)
    }

    async fn create_review(&self, input: &NewBidReview) -> StoreResult<BidReview> {
        Ok(BidReviewRepo::create(&self.pool, input).await?)
    }

    async fn list_reviews(&self, filter: &ReviewFilter, page: Page) -> StoreResult<Vec<BidReview>> {
        Ok(BidReviewRepo::list_for_author(&self.pool, filter, page).await?)
    }
}

/// An open PostgreSQL transaction. Dropping it rolls back.
pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn lock_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>> {
        Ok(TenderRepo::find_for_update(&mut *self.tx, id).await?)
    }

    async fn lock_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>> {
        Ok(BidRepo::find_for_update(&mut *self.tx, id).await?)
    }

    async fn snapshot_tender(&mut self, tender: &Tender) -> StoreResult<()> {
        TenderVersionRepo::create(&mut *self.tx, tender).await?;
        Ok(())
    }

    async fn snapshot_bid(&mut self, bid: &Bid) -> StoreResult<()> {
        BidVersionRepo::create(&mut *self.tx, bid).await?;
        Ok(())
    }

    async fn find_tender_version(
        &mut self,
        tender_id: DbId,
        version: i32,
    ) -> StoreResult<Option<TenderVersion>> {
        Ok(TenderVersionRepo::find(&mut *self.tx, tender_id, version).await?)
    }

    async fn find_bid_version(
        &mut self,
        bid_id: DbId,
        version: i32,
    ) -> StoreResult<Option<BidVersion>> {
        Ok(BidVersionRepo::find(&mut *self.tx, bid_id, version).await?)
    }

    async fn update_tender(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &TenderChanges,
    ) -> StoreResult<Tender> {
        TenderRepo::update(&mut *self.tx, id, expected_version, changes)
            .await?
            .ok_or_else(|| version_conflict("Tender", id, expected_version))
    }

    async fn update_bid(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &BidChanges,
    ) -> StoreResult<Bid> {
        BidRepo::update(&mut *self.tx, id, expected_version, changes)
            .await?
            .ok_or_else(|| version_conflict("Bid", id, expected_version))
    }

    async fn count_responsibles(&mut self, organization_id: DbId) -> StoreResult<i64> {
        Ok(OrganizationRepo::count_responsibles(&mut *self.tx, organization_id).await?)
    }

    async fn ballot_exists(&mut self, bid_id: DbId, username: &str) -> StoreResult<bool> {
        Ok(BidApproveRepo::exists(&mut *self.tx, bid_id, username).await?)
    }

    async fn insert_ballot(&mut self, bid_id: DbId, username: &str) -> StoreResult<()> {
        match BidApproveRepo::create(&mut *self.tx, bid_id, username).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_ballot(&err) => Err(StoreError::DuplicateBallot {
                bid_id,
                username: username.to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
