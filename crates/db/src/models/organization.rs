//! Employee, organization and responsibility models.

use serde::Serialize;
use sqlx::FromRow;
use tenderhub_core::types::{DbId, Timestamp};

/// A row from the `employee` table. The username is the caller identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: Timestamp,
}

/// A row from the `organization` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub organization_type: String,
    pub created_at: Timestamp,
}
