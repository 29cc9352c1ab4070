//! Tender operations.

use std::str::FromStr;

use tenderhub_core::error::CoreError;
use tenderhub_core::pagination::Page;
use tenderhub_core::tender::TenderStatus;
use tenderhub_core::types::DbId;
use tenderhub_db::models::organization::Employee;
use tenderhub_db::models::tender::{CreateTender, Tender, TenderChanges, TenderFilter, UpdateTender};
use tenderhub_db::Store;
use validator::Validate;

use crate::engine::gate::{ensure_responsible, identify};
use crate::engine::versions::{lock_tender, revise_tender};
use crate::error::{AppError, AppResult};

/// Fetch a tender or fail with 404.
pub async fn find_tender(store: &dyn Store, id: DbId) -> AppResult<Tender> {
    let tender = store
        .find_tender(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Tender", id))?;
    Ok(tender)
}

/// Parse a required `status` query parameter.
pub fn parse_status<T>(raw: Option<&str>) -> AppResult<T>
where
    T: FromStr<Err = CoreError>,
{
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::Validation("No status provided".into()))?;
    Ok(raw.parse()?)
}

/// Create a tender in status `Created` at version 1.
pub async fn create_tender(store: &dyn Store, input: CreateTender) -> AppResult<Tender> {
    input.validate()?;

    identify(store, Some(&input.creator_username)).await?;
    if !store.organization_exists(input.organization_id).await? {
        return Err(CoreError::not_found("Organization", input.organization_id).into());
    }
    ensure_responsible(store, input.organization_id, &input.creator_username).await?;

    let tender = store.create_tender(&input).await?;
    tracing::info!(
        tender_id = %tender.id,
        organization_id = %tender.organization_id,
        creator = %tender.creator_username,
        "Tender created"
    );
    Ok(tender)
}

/// Published tenders, optionally of one service type, ordered by name.
pub async fn list_tenders(
    store: &dyn Store,
    service_type: Option<String>,
    page: Page,
) -> AppResult<Vec<Tender>> {
    let filter = TenderFilter::Published {
        service_type: service_type.filter(|s| !s.is_empty()),
    };
    Ok(store.list_tenders(&filter, page).await?)
}

/// Tenders created by the caller, any status.
pub async fn list_user_tenders(
    store: &dyn Store,
    username: Option<&str>,
    page: Page,
) -> AppResult<Vec<Tender>> {
    let employee = identify(store, username).await?;
    let filter = TenderFilter::CreatedBy {
        username: employee.username,
    };
    Ok(store.list_tenders(&filter, page).await?)
}

/// Current status. Unpublished tenders are visible to their organization only.
pub async fn tender_status(
    store: &dyn Store,
    id: DbId,
    username: Option<&str>,
) -> AppResult<TenderStatus> {
    let employee = identify(store, username).await?;
    let tender = find_tender(store, id).await?;
    if !tender.status.is_public() {
        ensure_responsible(store, tender.organization_id, &employee.username).await?;
    }
    Ok(tender.status)
}

pub async fn edit_tender_status(
    store: &dyn Store,
    id: DbId,
    username: Option<&str>,
    status: Option<&str>,
) -> AppResult<Tender> {
    let (employee, _) = authorize_tender(store, id, username).await?;
    let status: TenderStatus = parse_status(status)?;

    let mut tx = store.begin().await?;
    let current = lock_tender(tx.as_mut(), id).await?;
    let updated = revise_tender(tx.as_mut(), &current, &TenderChanges::status(status)).await?;
    tx.commit().await?;

    tracing::info!(
        tender_id = %id,
        from = %current.status,
        to = %updated.status,
        version = updated.version,
        user = %employee.username,
        "Tender status changed"
    );
    Ok(updated)
}

/// Partial edit of name, description and service type.
pub async fn edit_tender(
    store: &dyn Store,
    id: DbId,
    username: Option<&str>,
    input: UpdateTender,
) -> AppResult<Tender> {
    let (employee, _) = authorize_tender(store, id, username).await?;

    if input.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".into()));
    }
    input.validate()?;

    let mut tx = store.begin().await?;
    let current = lock_tender(tx.as_mut(), id).await?;
    let updated = revise_tender(tx.as_mut(), &current, &TenderChanges::from(input)).await?;
    tx.commit().await?;

    tracing::info!(tender_id = %id, version = updated.version, user = %employee.username, "Tender edited");
    Ok(updated)
}

/// Identity, then the tender, then rights on its organization.
pub async fn authorize_tender(
    store: &dyn Store,
    id: DbId,
    username: Option<&str>,
) -> AppResult<(Employee, Tender)> {
    let employee = identify(store, username).await?;
    let tender = find_tender(store, id).await?;
    ensure_responsible(store, tender.organization_id, &employee.username).await?;
    Ok((employee, tender))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::engine::fixtures::World;

    fn new_tender(world: &World, name: &str, creator: &str) -> CreateTender {
        CreateTender {
            name: name.into(),
            description: "Road repair".into(),
            service_type: "Construction".into(),
            organization_id: world.org.id,
            creator_username: creator.into(),
        }
    }

    #[tokio::test]
    async fn created_tender_starts_at_version_one() {
        let world = World::new().await;
        let tender = create_tender(&world.store, new_tender(&world, "Roads", "alice"))
            .await
            .unwrap();
        assert_eq!(tender.status, TenderStatus::Created);
        assert_eq!(tender.version, 1);
        assert!(world.store.list_tender_versions(tender.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_checks_identity_organization_and_rights() {
        let world = World::new().await;
        assert_matches!(
            create_tender(&world.store, new_tender(&world, "Roads", "ghost")).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        assert_matches!(
            create_tender(&world.store, new_tender(&world, "Roads", "carol")).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );

        let mut orphan = new_tender(&world, "Roads", "alice");
        orphan.organization_id = uuid::Uuid::new_v4();
        assert_matches!(
            create_tender(&world.store, orphan).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Organization", .. }))
        );

        assert_matches!(
            create_tender(&world.store, new_tender(&world, "", "alice")).await,
            Err(AppError::BadRequest(_))
        );
    }

    #[tokio::test]
    async fn public_listing_shows_published_only_sorted_by_name() {
        let world = World::new().await;
        world.published_tender("Zebra crossing").await;
        world.published_tender("Asphalt").await;
        world.draft_tender("Hidden").await;

        let names: Vec<String> = world
            .published_tenders()
            .await
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Asphalt", "Zebra crossing"]);

        let page = Page { limit: Some(1), offset: 1 };
        let paged = list_tenders(&world.store, None, page).await.unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].name, "Zebra crossing");

        let none = list_tenders(&world.store, Some("Delivery".into()), Page::default())
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn my_tenders_include_drafts() {
        let world = World::new().await;
        world.draft_tender("Draft").await;
        world.published_tender("Live").await;

        let mine = list_user_tenders(&world.store, Some("alice"), Page::default())
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);
        let bobs = list_user_tenders(&world.store, Some("bob"), Page::default())
            .await
            .unwrap();
        assert!(bobs.is_empty());
    }

    #[tokio::test]
    async fn draft_status_is_hidden_from_outsiders() {
        let world = World::new().await;
        let draft = world.draft_tender("Draft").await;

        assert_eq!(
            tender_status(&world.store, draft.id, Some("bob")).await.unwrap(),
            TenderStatus::Created
        );
        assert_matches!(
            tender_status(&world.store, draft.id, Some("carol")).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );

        let live = world.published_tender("Live").await;
        assert_eq!(
            tender_status(&world.store, live.id, Some("carol")).await.unwrap(),
            TenderStatus::Published
        );
    }

    #[tokio::test]
    async fn status_edit_validates_after_rights() {
        let world = World::new().await;
        let tender = world.draft_tender("Roads").await;

        assert_matches!(
            edit_tender_status(&world.store, tender.id, Some("carol"), Some("Bogus")).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        assert_matches!(
            edit_tender_status(&world.store, tender.id, Some("alice"), Some("Bogus")).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            edit_tender_status(&world.store, tender.id, Some("alice"), None).await,
            Err(AppError::Core(CoreError::Validation(msg))) if msg == "No status provided"
        );
        assert_eq!(world.tender(&tender).await.version, 1);
    }

    #[tokio::test]
    async fn n_mutations_leave_n_snapshots() {
        let world = World::new().await;
        let tender = world.draft_tender("Roads").await;

        edit_tender_status(&world.store, tender.id, Some("alice"), Some("Published"))
            .await
            .unwrap();
        edit_tender(
            &world.store,
            tender.id,
            Some("bob"),
            UpdateTender {
                name: Some("Roads and bridges".into()),
                ..UpdateTender::default()
            },
        )
        .await
        .unwrap();
        edit_tender_status(&world.store, tender.id, Some("alice"), Some("Closed"))
            .await
            .unwrap();

        let current = world.tender(&tender).await;
        assert_eq!(current.version, 4);
        World::assert_status(&current, TenderStatus::Closed);
        let versions: Vec<i32> = world
            .store
            .list_tender_versions(tender.id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.version)
            .collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn edit_keeps_absent_fields() {
        let world = World::new().await;
        let tender = world.draft_tender("Roads").await;

        let updated = edit_tender(
            &world.store,
            tender.id,
            Some("alice"),
            UpdateTender {
                service_type: Some("Delivery".into()),
                ..UpdateTender::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Roads");
        assert_eq!(updated.description, tender.description);
        assert_eq!(updated.service_type, "Delivery");
        assert_eq!(updated.organization_id, tender.organization_id);
    }

    #[tokio::test]
    async fn empty_or_invalid_edit_writes_nothing() {
        let world = World::new().await;
        let tender = world.draft_tender("Roads").await;

        assert_matches!(
            edit_tender(&world.store, tender.id, Some("alice"), UpdateTender::default()).await,
            Err(AppError::BadRequest(_))
        );
        assert_matches!(
            edit_tender(
                &world.store,
                tender.id,
                Some("alice"),
                UpdateTender {
                    name: Some(String::new()),
                    ..UpdateTender::default()
                },
            )
            .await,
            Err(AppError::BadRequest(_))
        );
        assert_eq!(world.tender(&tender).await.version, 1);
        assert!(world.store.list_tender_versions(tender.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_tender_is_not_found_after_identity() {
        let world = World::new().await;
        let missing = uuid::Uuid::new_v4();
        assert_matches!(
            tender_status(&world.store, missing, Some("alice")).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Tender", .. }))
        );
        assert_matches!(
            tender_status(&world.store, missing, None).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }
}
