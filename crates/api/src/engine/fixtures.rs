//! Seeded in-memory world shared by the engine tests.

use tenderhub_core::bid::AuthorType;
use tenderhub_core::pagination::Page;
use tenderhub_core::tender::TenderStatus;
use tenderhub_db::models::bid::{Bid, CreateBid};
use tenderhub_db::models::organization::{Employee, Organization};
use tenderhub_db::models::tender::{CreateTender, Tender};
use tenderhub_db::{MemoryStore, Store};

use crate::engine::{bids, tenders};

/// Two organizations:
///
/// - `org` with responsible employees `alice` and `bob`
/// - `other_org` with responsible employee `carol`
///
/// plus `dave`, an employee with no organization.
pub(crate) struct World {
    pub store: MemoryStore,
    pub org: Organization,
    pub other_org: Organization,
    pub alice: Employee,
    pub bob: Employee,
    pub carol: Employee,
    pub dave: Employee,
}

impl World {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let org = store.add_organization("Acme").await;
        let other_org = store.add_organization("Globex").await;
        let alice = store.add_employee("alice").await;
        let bob = store.add_employee("bob").await;
        let carol = store.add_employee("carol").await;
        let dave = store.add_employee("dave").await;
        store.add_responsible(org.id, alice.id).await;
        store.add_responsible(org.id, bob.id).await;
        store.add_responsible(other_org.id, carol.id).await;

        Self {
            store,
            org,
            other_org,
            alice,
            bob,
            carol,
            dave,
        }
    }

    /// Add `count` extra responsible employees to `org`.
    pub async fn grow_org(&self, count: usize) {
        for n in 0..count {
            let employee = self.store.add_employee(&format!("member{n}")).await;
            self.store.add_responsible(self.org.id, employee.id).await;
        }
    }

    /// A tender owned by `org`, created by alice, still in `Created`.
    pub async fn draft_tender(&self, name: &str) -> Tender {
        tenders::create_tender(
            &self.store,
            CreateTender {
                name: name.to_string(),
                description: format!("{name} description"),
                service_type: "Construction".into(),
                organization_id: self.org.id,
                creator_username: "alice".into(),
            },
        )
        .await
        .unwrap()
    }

    /// A published tender owned by `org`.
    pub async fn published_tender(&self, name: &str) -> Tender {
        let tender = self.draft_tender(name).await;
        tenders::edit_tender_status(&self.store, tender.id, Some("alice"), Some("Published"))
            .await
            .unwrap()
    }

    /// A bid by `other_org` on `tender`.
    pub async fn bid_on(&self, tender: &Tender, name: &str) -> Bid {
        bids::create_bid(
            &self.store,
            CreateBid {
                name: name.to_string(),
                description: format!("{name} description"),
                tender_id: tender.id,
                author_type: AuthorType::Organization,
                author_id: self.other_org.id,
            },
        )
        .await
        .unwrap()
    }

    /// A bid by `org` on its own tender.
    pub async fn own_bid_on(&self, tender: &Tender, name: &str) -> Bid {
        bids::create_bid(
            &self.store,
            CreateBid {
                name: name.to_string(),
                description: format!("{name} description"),
                tender_id: tender.id,
                author_type: AuthorType::Organization,
                author_id: self.org.id,
            },
        )
        .await
        .unwrap()
    }

    /// A bid submitted by carol as a user on `tender`.
    pub async fn user_bid_on(&self, tender: &Tender, name: &str) -> Bid {
        bids::create_bid(
            &self.store,
            CreateBid {
                name: name.to_string(),
                description: String::new(),
                tender_id: tender.id,
                author_type: AuthorType::User,
                author_id: self.carol.id,
            },
        )
        .await
        .unwrap()
    }

    pub async fn tender(&self, tender: &Tender) -> Tender {
        self.store.find_tender(tender.id).await.unwrap().unwrap()
    }

    pub async fn bid(&self, bid: &Bid) -> Bid {
        self.store.find_bid(bid.id).await.unwrap().unwrap()
    }

    pub async fn published_tenders(&self) -> Vec<Tender> {
        tenders::list_tenders(&self.store, None, Page::default())
            .await
            .unwrap()
    }

    pub fn assert_status(tender: &Tender, status: TenderStatus) {
        assert_eq!(tender.status, status, "tender {} status", tender.name);
    }
}
