//! Authorization gate: who is calling, and may they act for an organization.

use tenderhub_core::error::CoreError;
use tenderhub_core::types::DbId;
use tenderhub_db::models::organization::Employee;
use tenderhub_db::Store;

use crate::error::AppResult;

/// Resolve the calling username to an employee.
///
/// A missing or empty username and an unknown username are both 401.
pub async fn identify(store: &dyn Store, username: Option<&str>) -> AppResult<Employee> {
    let username = username
        .filter(|u| !u.is_empty())
        .ok_or_else(|| CoreError::Unauthorized("No user provided".into()))?;

    let employee = store
        .find_employee_by_username(username)
        .await?
        .ok_or_else(|| CoreError::Unauthorized("No such user".into()))?;
    Ok(employee)
}

/// Fail with 403 unless `username` is on the organization's responsible roster.
pub async fn ensure_responsible(
    store: &dyn Store,
    organization_id: DbId,
    username: &str,
) -> AppResult<()> {
    if store.is_responsible(organization_id, username).await? {
        Ok(())
    } else {
        tracing::debug!(%organization_id, username, "Rights check failed");
        Err(CoreError::Forbidden("Don't have rights".into()).into())
    }
}
