//! Tender entity model, version snapshots and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tenderhub_core::tender::TenderStatus;
use tenderhub_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `tender` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    #[sqlx(try_from = "String")]
    pub status: TenderStatus,
    pub organization_id: DbId,
    pub creator_username: String,
    pub version: i32,
    pub created_at: Timestamp,
    #[serde(skip)]
    pub updated_at: Timestamp,
}

impl Tender {
    /// The content fields captured by a snapshot of this tender.
    pub fn content(&self) -> TenderContent {
        TenderContent {
            name: self.name.clone(),
            description: self.description.clone(),
            service_type: self.service_type.clone(),
            status: self.status,
        }
    }
}

/// The rollback-able fields of a tender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderContent {
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: TenderStatus,
}

/// A row from the `tender_version` table: the tender as it was at `version`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderVersion {
    pub id: DbId,
    pub tender_id: DbId,
    pub version: i32,
    pub name: String,
    pub description: String,
    pub service_type: String,
    #[sqlx(try_from = "String")]
    pub status: TenderStatus,
    pub created_at: Timestamp,
}

impl TenderVersion {
    pub fn content(&self) -> TenderContent {
        TenderContent {
            name: self.name.clone(),
            description: self.description.clone(),
            service_type: self.service_type.clone(),
            status: self.status,
        }
    }
}

/// Request body for creating a tender.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTender {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,
    pub organization_id: DbId,
    #[validate(length(min = 1, max = 50))]
    pub creator_username: String,
}

/// Request body for editing a tender. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTender {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub service_type: Option<String>,
}

impl UpdateTender {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.service_type.is_none()
    }
}

/// Field changes applied to a live tender row together with a version bump.
///
/// `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenderChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<String>,
    pub status: Option<TenderStatus>,
}

impl TenderChanges {
    pub fn status(status: TenderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Restore every content field from a snapshot.
    pub fn restore(content: TenderContent) -> Self {
        Self {
            name: Some(content.name),
            description: Some(content.description),
            service_type: Some(content.service_type),
            status: Some(content.status),
        }
    }

    /// Apply to an in-memory copy of the row.
    pub fn apply_to(&self, tender: &mut Tender) {
        if let Some(name) = &self.name {
            tender.name = name.clone();
        }
        if let Some(description) = &self.description {
            tender.description = description.clone();
        }
        if let Some(service_type) = &self.service_type {
            tender.service_type = service_type.clone();
        }
        if let Some(status) = self.status {
            tender.status = status;
        }
    }
}

impl From<UpdateTender> for TenderChanges {
    fn from(input: UpdateTender) -> Self {
        Self {
            name: input.name,
            description: input.description,
            service_type: input.service_type,
            status: None,
        }
    }
}

/// Which tenders a listing returns. Results are ordered by name ascending.
#[derive(Debug, Clone, PartialEq)]
pub enum TenderFilter {
    /// Published tenders, optionally restricted to one service type.
    Published { service_type: Option<String> },
    /// Tenders created by the given username, any status.
    CreatedBy { username: String },
}

impl TenderFilter {
    pub fn matches(&self, tender: &Tender) -> bool {
        match self {
            TenderFilter::Published { service_type } => {
                tender.status == TenderStatus::Published
                    && service_type
                        .as_deref()
                        .map_or(true, |st| tender.service_type == st)
            }
            TenderFilter::CreatedBy { username } => tender.creator_username == *username,
        }
    }
}
