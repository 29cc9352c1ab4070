//! Repository for the `tender_version` snapshot table (append-only).

use sqlx::PgExecutor;
use tenderhub_core::types::DbId;

use crate::models::tender::{Tender, TenderVersion};

const COLUMNS: &str = "id, tender_id, version, name, description, service_type, status, created_at";

pub struct TenderVersionRepo;

impl TenderVersionRepo {
    /// Record `tender` as it stands, tagged with its current version.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        tender: &Tender,
    ) -> Result<TenderVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO tender_version (tender_id, version, name, description, service_type, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TenderVersion>(&query)
            .bind(tender.id)
            .bind(tender.version)
            .bind(&tender.name)
            .bind(&tender.description)
            .bind(&tender.service_type)
            .bind(tender.status.as_str())
            .fetch_one(executor)
            .await
    }

    pub async fn find<'e>(
        executor: impl PgExecutor<'e>,
        tender_id: DbId,
        version: i32,
    ) -> Result<Option<TenderVersion>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tender_version WHERE tender_id = $1 AND version = $2");
        sqlx::query_as::<_, TenderVersion>(&query)
            .bind(tender_id)
            .bind(version)
            .fetch_optional(executor)
            .await
    }

    /// All snapshots of a tender, oldest version first.
    pub async fn list_for_tender<'e>(
        executor: impl PgExecutor<'e>,
        tender_id: DbId,
    ) -> Result<Vec<TenderVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tender_version WHERE tender_id = $1 ORDER BY version ASC"
        );
        sqlx::query_as::<_, TenderVersion>(&query)
            .bind(tender_id)
            .fetch_all(executor)
            .await
    }
}
