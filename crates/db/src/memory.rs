//! In-memory implementation of [`Store`] for tests.
//!
//! The whole state sits behind one async mutex. A transaction takes the lock
//! for its lifetime and works on a private copy that replaces the shared
//! state on commit, so dropping an uncommitted [`MemoryTx`] discards every
//! write. Store methods called while a transaction is open wait for it to
//! finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tenderhub_core::bid::{AuthorType, BidDecision, BidStatus};
use tenderhub_core::pagination::Page;
use tenderhub_core::tender::TenderStatus;
use tenderhub_core::types::DbId;
use tenderhub_core::versioning::{next_version, INITIAL_VERSION};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::models::bid::{Bid, BidApprove, BidChanges, BidFilter, BidVersion, NewBid};
use crate::models::organization::{Employee, Organization};
use crate::models::review::{BidReview, NewBidReview, ReviewFilter};
use crate::models::tender::{CreateTender, Tender, TenderChanges, TenderFilter, TenderVersion};
use crate::store::{Store, StoreError, StoreResult, StoreTx};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    employees: Vec<Employee>,
    organizations: Vec<Organization>,
    /// `(organization_id, user_id)` pairs.
    responsibles: Vec<(DbId, DbId)>,
    tenders: Vec<Tender>,
    tender_versions: Vec<TenderVersion>,
    bids: Vec<Bid>,
    bid_versions: Vec<BidVersion>,
    ballots: Vec<BidApprove>,
    reviews: Vec<BidReview>,
}

impl MemoryState {
    fn employee_by_username(&self, username: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.username == username)
    }

    fn is_responsible(&self, organization_id: DbId, username: &str) -> bool {
        self.employee_by_username(username).is_some_and(|employee| {
            self.responsibles
                .iter()
                .any(|&(org, user)| org == organization_id && user == employee.id)
        })
    }

    fn update_tender(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &TenderChanges,
    ) -> StoreResult<Tender> {
        let tender = self
            .tenders
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::Missing { entity: "Tender", id })?;
        if tender.version != expected_version {
            return Err(StoreError::VersionConflict {
                entity: "Tender",
                id,
                expected: expected_version,
            });
        }
        changes.apply_to(tender);
        tender.version = next_version(tender.version);
        tender.updated_at = Utc::now();
        Ok(tender.clone())
    }

    fn update_bid(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &BidChanges,
    ) -> StoreResult<Bid> {
        let bid = self
            .bids
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::Missing { entity: "Bid", id })?;
        if bid.version != expected_version {
            return Err(StoreError::VersionConflict {
                entity: "Bid",
                id,
                expected: expected_version,
            });
        }
        changes.apply_to(bid);
        bid.version = next_version(bid.version);
        bid.updated_at = Utc::now();
        Ok(bid.clone())
    }
}

/// [`Store`] holding everything in process memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_snapshots: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ──────────────────────────────────────────────────────

    pub async fn add_employee(&self, username: &str) -> Employee {
        let employee = Employee {
            id: Uuid::new_v4(),
            username: username.to_string(),
            first_name: None,
            last_name: None,
            created_at: Utc::now(),
        };
        self.state.lock().await.employees.push(employee.clone());
        employee
    }

    pub async fn add_organization(&self, name: &str) -> Organization {
        let organization = Organization {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            organization_type: "LLC".to_string(),
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .await
            .organizations
            .push(organization.clone());
        organization
    }

    pub async fn add_responsible(&self, organization_id: DbId, user_id: DbId) {
        let mut state = self.state.lock().await;
        if !state.responsibles.contains(&(organization_id, user_id)) {
            state.responsibles.push((organization_id, user_id));
        }
    }

    /// Make every subsequent snapshot write fail with a database error.
    pub fn fail_snapshots(&self, fail: bool) {
        self.fail_snapshots.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            working,
            fail_snapshots: self.fail_snapshots.load(Ordering::SeqCst),
        }))
    }

    async fn find_employee_by_username(&self, username: &str) -> StoreResult<Option<Employee>> {
        Ok(self.state.lock().await.employee_by_username(username).cloned())
    }

    async fn find_employee_by_id(&self, id: DbId) -> StoreResult<Option<Employee>> {
        let state = self.state.lock().await;
        Ok(state.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn organization_exists(&self, id: DbId) -> StoreResult<bool> {
        let state = self.state.lock().await;
        Ok(state.organizations.iter().any(|o| o.id == id))
    }

    async fn is_responsible(&self, organization_id: DbId, username: &str) -> StoreResult<bool> {
        Ok(self.state.lock().await.is_responsible(organization_id, username))
    }

    async fn find_user_organization(&self, user_id: DbId) -> StoreResult<Option<DbId>> {
        let state = self.state.lock().await;
        Ok(state
            .responsibles
            .iter()
            .filter(|&&(_, user)| user == user_id)
            .map(|&(org, _)| org)
            .min())
    }

    async fn find_tender(&self, id: DbId) -> StoreResult<Option<Tender>> {
        let state = self.state.lock().await;
        Ok(state.tenders.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tenders(&self, filter: &TenderFilter, page: Page) -> StoreResult<Vec<Tender>> {
        let state = self.state.lock().await;
        let mut tenders: Vec<Tender> = state
            .tenders
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tenders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page.slice(tenders))
    }

    async fn create_tender(&self, input: &CreateTender) -> StoreResult<Tender> {
        let now = Utc::now();
        let tender = Tender {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            description: input.description.clone(),
            service_type: input.service_type.clone(),
            status: TenderStatus::Created,
            organization_id: input.organization_id,
            creator_username: input.creator_username.clone(),
            version: INITIAL_VERSION,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.tenders.push(tender.clone());
        Ok(tender)
    }

    async fn list_tender_versions(&self, tender_id: DbId) -> StoreResult<Vec<TenderVersion>> {
        let state = self.state.lock().await;
        let mut versions: Vec<TenderVersion> = state
            .tender_versions
            .iter()
            .filter(|v| v.tender_id == tender_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    async fn find_bid(&self, id: DbId) -> StoreResult<Option<Bid>> {
        let state = self.state.lock().await;
        Ok(state.bids.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bids(&self, filter: &BidFilter, page: Page) -> StoreResult<Vec<Bid>> {
        let state = self.state.lock().await;
        let mut bids: Vec<Bid> = state
            .bids
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        bids.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page.slice(bids))
    }

    async fn create_bid(&self, input: &NewBid) -> StoreResult<Bid> {
        let now = Utc::now();
        let bid = Bid {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            description: input.description.clone(),
            status: BidStatus::Created,
            tender_id: input.tender_id,
            author_type: input.author_type,
            author_id: input.author_id,
            organization_id: input.organization_id,
            decision: BidDecision::Pending,
            approved_count: 0,
            version: INITIAL_VERSION,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.bids.push(bid.clone());
        Ok(bid)
    }

    async fn list_bid_versions(&self, bid_id: DbId) -> StoreResult<Vec<BidVersion>> {
        let state = self.state.lock().await;
        let mut versions: Vec<BidVersion> = state
            .bid_versions
            .iter()
            .filter(|v| v.bid_id == bid_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    async fn list_ballots(&self, bid_id: DbId) -> StoreResult<Vec<String>> {
        let state = self.state.lock().await;
        Ok(state
            .ballots
            .iter()
            .filter(|b| b.bid_id == bid_id)
            .map(|b| b.username.clone())
            .collect())
    }

    async fn create_review(&self, input: &NewBidReview) -> StoreResult<BidReview> {
        let review = BidReview {
            id: Uuid::new_v4(),
            bid_id: input.bid_id,
            username: input.username.clone(),
            review: input.review.clone(),
            created_at: Utc::now(),
        };
        self.state.lock().await.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews(&self, filter: &ReviewFilter, page: Page) -> StoreResult<Vec<BidReview>> {
        let state = self.state.lock().await;
        let on_author_bids = |review: &&BidReview| {
            state.bids.iter().any(|bid| {
                bid.id == review.bid_id
                    && bid.author_id == filter.author_id
                    && bid.author_type == AuthorType::User
                    && bid.tender_id != filter.exclude_tender_id
            })
        };
        // Insertion order is chronological.
        let reviews: Vec<BidReview> = state
            .reviews
            .iter()
            .rev()
            .filter(on_author_bids)
            .cloned()
            .collect();
        Ok(page.slice(reviews))
    }
}

/// An open in-memory transaction holding the store lock.
pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    fail_snapshots: bool,
}

impl MemoryTx {
    fn check_snapshot_write(&self) -> StoreResult<()> {
        if self.fail_snapshots {
            return Err(StoreError::Database(sqlx::Error::Protocol(
                "snapshot write failed".into(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_tender(&mut self, id: DbId) -> StoreResult<Option<Tender>> {
        Ok(self.working.tenders.iter().find(|t| t.id == id).cloned())
    }

    async fn lock_bid(&mut self, id: DbId) -> StoreResult<Option<Bid>> {
        Ok(self.working.bids.iter().find(|b| b.id == id).cloned())
    }

    async fn snapshot_tender(&mut self, tender: &Tender) -> StoreResult<()> {
        self.check_snapshot_write()?;
        self.working.tender_versions.push(TenderVersion {
            id: Uuid::new_v4(),
            tender_id: tender.id,
            version: tender.version,
            name: tender.name.clone(),
            description: tender.description.clone(),
            service_type: tender.service_type.clone(),
            status: tender.status,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn snapshot_bid(&mut self, bid: &Bid) -> StoreResult<()> {
        self.check_snapshot_write()?;
        self.working.bid_versions.push(BidVersion {
            id: Uuid::new_v4(),
            bid_id: bid.id,
            version: bid.version,
            name: bid.name.clone(),
            description: bid.description.clone(),
            status: bid.status,
            decision: bid.decision,
            approved_count: bid.approved_count,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn find_tender_version(
        &mut self,
        tender_id: DbId,
        version: i32,
    ) -> StoreResult<Option<TenderVersion>> {
        Ok(self
            .working
            .tender_versions
            .iter()
            .find(|v| v.tender_id == tender_id && v.version == version)
            .cloned())
    }

    async fn find_bid_version(
        &mut self,
        bid_id: DbId,
        version: i32,
    ) -> StoreResult<Option<BidVersion>> {
        Ok(self
            .working
            .bid_versions
            .iter()
            .find(|v| v.bid_id == bid_id && v.version == version)
            .cloned())
    }

    async fn update_tender(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &TenderChanges,
    ) -> StoreResult<Tender> {
        self.working.update_tender(id, expected_version, changes)
    }

    async fn update_bid(
        &mut self,
        id: DbId,
        expected_version: i32,
        changes: &BidChanges,
    ) -> StoreResult<Bid> {
        self.working.update_bid(id, expected_version, changes)
    }

    async fn count_responsibles(&mut self, organization_id: DbId) -> StoreResult<i64> {
        let count = self
            .working
            .responsibles
            .iter()
            .filter(|&&(org, _)| org == organization_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn ballot_exists(&mut self, bid_id: DbId, username: &str) -> StoreResult<bool> {
        Ok(self
            .working
            .ballots
            .iter()
            .any(|b| b.bid_id == bid_id && b.username == username))
    }

    async fn insert_ballot(&mut self, bid_id: DbId, username: &str) -> StoreResult<()> {
        if self.ballot_exists(bid_id, username).await? {
            return Err(StoreError::DuplicateBallot {
                bid_id,
                username: username.to_string(),
            });
        }
        self.working.ballots.push(BidApprove {
            id: Uuid::new_v4(),
            bid_id,
            username: username.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTx {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}
