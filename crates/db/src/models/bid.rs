//! Bid entity model, version snapshots, ballots and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tenderhub_core::bid::{AuthorType, BidDecision, BidStatus};
use tenderhub_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `bid` table.
///
/// `organization_id`, `decision` and `approved_count` drive authorization
/// and the approval process and are never sent to clients.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: DbId,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: BidStatus,
    pub tender_id: DbId,
    #[sqlx(try_from = "String")]
    pub author_type: AuthorType,
    pub author_id: DbId,
    #[serde(skip)]
    pub organization_id: DbId,
    #[serde(skip)]
    #[sqlx(try_from = "String")]
    pub decision: BidDecision,
    #[serde(skip)]
    pub approved_count: i32,
    pub version: i32,
    pub created_at: Timestamp,
    #[serde(skip)]
    pub updated_at: Timestamp,
}

impl Bid {
    /// The rollback-able fields of this bid.
    pub fn content(&self) -> BidContent {
        BidContent {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}

/// The rollback-able fields of a bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidContent {
    pub name: String,
    pub description: String,
    pub status: BidStatus,
}

/// A row from the `bid_version` table: the bid as it was at `version`.
///
/// The decision state is recorded for audit but is not restored by a
/// rollback.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidVersion {
    pub id: DbId,
    pub bid_id: DbId,
    pub version: i32,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: BidStatus,
    #[sqlx(try_from = "String")]
    pub decision: BidDecision,
    pub approved_count: i32,
    pub created_at: Timestamp,
}

impl BidVersion {
    pub fn content(&self) -> BidContent {
        BidContent {
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
        }
    }
}

/// A row from the `bid_approve` table: one approving vote.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidApprove {
    pub id: DbId,
    pub bid_id: DbId,
    pub username: String,
    pub created_at: Timestamp,
}

/// Request body for creating a bid.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBid {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    pub tender_id: DbId,
    pub author_type: AuthorType,
    pub author_id: DbId,
}

/// A bid ready to insert, with its organization already resolved.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub name: String,
    pub description: String,
    pub tender_id: DbId,
    pub author_type: AuthorType,
    pub author_id: DbId,
    pub organization_id: DbId,
}

/// Request body for editing a bid. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBid {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

impl UpdateBid {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Field changes applied to a live bid row together with a version bump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<BidStatus>,
    pub decision: Option<BidDecision>,
    pub approved_count: Option<i32>,
}

impl BidChanges {
    pub fn status(status: BidStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Restore the content fields from a snapshot.
    pub fn restore(content: BidContent) -> Self {
        Self {
            name: Some(content.name),
            description: Some(content.description),
            status: Some(content.status),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, bid: &mut Bid) {
        if let Some(name) = &self.name {
            bid.name = name.clone();
        }
        if let Some(description) = &self.description {
            bid.description = description.clone();
        }
        if let Some(status) = self.status {
            bid.status = status;
        }
        if let Some(decision) = self.decision {
            bid.decision = decision;
        }
        if let Some(approved_count) = self.approved_count {
            bid.approved_count = approved_count;
        }
    }
}

impl From<UpdateBid> for BidChanges {
    fn from(input: UpdateBid) -> Self {
        Self {
            name: input.name,
            description: input.description,
            ..Self::default()
        }
    }
}

/// Which bids a listing returns. Results are ordered by name ascending.
#[derive(Debug, Clone, PartialEq)]
pub enum BidFilter {
    /// Bids whose author is the given employee.
    AuthoredBy { author_id: DbId },
    /// Bids on a tender that are published or belong to `organization_id`.
    OnTender {
        tender_id: DbId,
        organization_id: Option<DbId>,
    },
}

impl BidFilter {
    pub fn matches(&self, bid: &Bid) -> bool {
        match self {
            BidFilter::AuthoredBy { author_id } => bid.author_id == *author_id,
            BidFilter::OnTender {
                tender_id,
                organization_id,
            } => {
                bid.tender_id == *tender_id
                    && (bid.status == BidStatus::Published
                        || Some(bid.organization_id) == *organization_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bid() -> Bid {
        let now = chrono::Utc::now();
        Bid {
            id: uuid::Uuid::new_v4(),
            name: "Paving".into(),
            description: "Asphalt works".into(),
            status: BidStatus::Created,
            tender_id: uuid::Uuid::new_v4(),
            author_type: AuthorType::User,
            author_id: uuid::Uuid::new_v4(),
            organization_id: uuid::Uuid::new_v4(),
            decision: BidDecision::Pending,
            approved_count: 0,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn serialized_bid_hides_internal_fields() {
        let json = serde_json::to_value(sample_bid()).unwrap();
        assert_eq!(json["name"], "Paving");
        assert_eq!(json["authorType"], "User");
        assert_eq!(json["status"], "Created");
        assert!(json.get("organizationId").is_none());
        assert!(json.get("decision").is_none());
        assert!(json.get("approvedCount").is_none());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn restore_leaves_decision_state_alone() {
        let mut bid = sample_bid();
        bid.decision = BidDecision::Approved;
        bid.approved_count = 2;

        BidChanges::restore(BidContent {
            name: "Old".into(),
            description: "Old description".into(),
            status: BidStatus::Published,
        })
        .apply_to(&mut bid);

        assert_eq!(bid.name, "Old");
        assert_eq!(bid.status, BidStatus::Published);
        assert_eq!(bid.decision, BidDecision::Approved);
        assert_eq!(bid.approved_count, 2);
    }

    #[test]
    fn tender_listing_filter_shows_own_unpublished_bids() {
        let bid = sample_bid();
        let own = BidFilter::OnTender {
            tender_id: bid.tender_id,
            organization_id: Some(bid.organization_id),
        };
        let foreign = BidFilter::OnTender {
            tender_id: bid.tender_id,
            organization_id: None,
        };
        assert!(own.matches(&bid));
        assert!(!foreign.matches(&bid));
    }
}
