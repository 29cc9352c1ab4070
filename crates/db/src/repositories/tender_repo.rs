//! Repository for the `tender` table.

use sqlx::PgExecutor;
use tenderhub_core::pagination::Page;
use tenderhub_core::types::DbId;

use crate::models::tender::{CreateTender, Tender, TenderChanges, TenderFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, service_type, status, organization_id, \
    creator_username, version, created_at, updated_at";

/// Provides CRUD operations for tenders. Versioning is the caller's job:
/// [`TenderRepo::update`] bumps the counter but never writes a snapshot.
pub struct TenderRepo;

impl TenderRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateTender,
    ) -> Result<Tender, sqlx::Error> {
        let query = format!(
            "INSERT INTO tender (name, description, service_type, organization_id, creator_username)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tender>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.service_type)
            .bind(input.organization_id)
            .bind(&input.creator_username)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Tender>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tender WHERE id = $1");
        sqlx::query_as::<_, Tender>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Read a tender and hold a row lock until the transaction ends.
    pub async fn find_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Tender>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tender WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Tender>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List tenders matching `filter`, ordered by name ascending.
    ///
    /// A `NULL` limit is `LIMIT ALL` in PostgreSQL.
    pub async fn list<'e>(
        executor: impl PgExecutor<'e>,
        filter: &TenderFilter,
        page: Page,
    ) -> Result<Vec<Tender>, sqlx::Error> {
        match filter {
            TenderFilter::Published { service_type } => {
                let query = format!(
                    "SELECT {COLUMNS} FROM tender
                     WHERE status = 'Published'
                       AND ($1::TEXT IS NULL OR service_type = $1)
                     ORDER BY name ASC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Tender>(&query)
                    .bind(service_type.as_deref())
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(executor)
                    .await
            }
            TenderFilter::CreatedBy { username } => {
                let query = format!(
                    "SELECT {COLUMNS} FROM tender
                     WHERE creator_username = $1
                     ORDER BY name ASC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Tender>(&query)
                    .bind(username)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(executor)
                    .await
            }
        }
    }

    /// Apply `changes` and bump the version, if the row is still at
    /// `expected_version`. Returns `None` when the compare-and-swap misses.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        expected_version: i32,
        changes: &TenderChanges,
    ) -> Result<Option<Tender>, sqlx::Error> {
        let query = format!(
            "UPDATE tender SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                service_type = COALESCE($5, service_type),
                status = COALESCE($6, status),
                version = version + 1,
                updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tender>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.service_type.as_deref())
            .bind(changes.status.map(|s| s.as_str()))
            .fetch_optional(executor)
            .await
    }
}
