//! Repository for the `organization` and `organization_responsible` tables.

use sqlx::PgExecutor;
use tenderhub_core::types::DbId;

/// Organization existence and responsible-roster queries.
pub struct OrganizationRepo;

impl OrganizationRepo {
    pub async fn exists<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM organization WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }

    /// Whether the employee named `username` is responsible for the organization.
    pub async fn is_responsible<'e>(
        executor: impl PgExecutor<'e>,
        organization_id: DbId,
        username: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1
                FROM organization_responsible r
                JOIN employee e ON r.user_id = e.id
                WHERE r.organization_id = $1 AND e.username = $2
             )",
        )
        .bind(organization_id)
        .bind(username)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// The organization an employee is responsible for.
    ///
    /// An employee is expected to belong to at most one roster; if there are
    /// several, the lowest organization id is returned.
    pub async fn find_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT organization_id FROM organization_responsible
             WHERE user_id = $1
             ORDER BY organization_id
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await?;
        Ok(row.map(|r| r.0))
    }

    pub async fn count_responsibles<'e>(
        executor: impl PgExecutor<'e>,
        organization_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(user_id) FROM organization_responsible WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }
}
