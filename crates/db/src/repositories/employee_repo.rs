//! Repository for the `employee` table.

use sqlx::PgExecutor;
use tenderhub_core::types::DbId;

use crate::models::organization::Employee;

const COLUMNS: &str = "id, username, first_name, last_name, created_at";

/// Read access to employees. Usernames are unique.
pub struct EmployeeRepo;

impl EmployeeRepo {
    pub async fn find_by_username<'e>(
        executor: impl PgExecutor<'e>,
        username: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE username = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(username)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
