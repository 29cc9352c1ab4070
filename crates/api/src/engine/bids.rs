//! Bid operations other than the approval process.

use tenderhub_core::bid::{AuthorType, BidStatus};
use tenderhub_core::error::CoreError;
use tenderhub_core::pagination::Page;
use tenderhub_core::types::DbId;
use tenderhub_db::models::bid::{Bid, BidChanges, BidFilter, CreateBid, NewBid, UpdateBid};
use tenderhub_db::models::organization::Employee;
use tenderhub_db::Store;
use validator::Validate;

use crate::engine::gate::{ensure_responsible, identify};
use crate::engine::tenders::{find_tender, parse_status};
use crate::engine::versions::{lock_bid, revise_bid};
use crate::error::{AppError, AppResult};

/// Fetch a bid or fail with 404.
pub async fn find_bid(store: &dyn Store, id: DbId) -> AppResult<Bid> {
    let bid = store
        .find_bid(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Bid", id))?;
    Ok(bid)
}

/// Identity, then the bid, then rights on the bid's organization.
pub async fn authorize_bid(
    store: &dyn Store,
    id: DbId,
    username: Option<&str>,
) -> AppResult<(Employee, Bid)> {
    let employee = identify(store, username).await?;
    let bid = find_bid(store, id).await?;
    ensure_responsible(store, bid.organization_id, &employee.username).await?;
    Ok((employee, bid))
}

/// The organization a bid is submitted for.
///
/// An organization author bids for itself. A user author bids for the
/// organization they are responsible for.
async fn resolve_bidder(store: &dyn Store, author_type: AuthorType, author_id: DbId) -> AppResult<DbId> {
    match author_type {
        AuthorType::Organization => {
            if store.organization_exists(author_id).await? {
                Ok(author_id)
            } else {
                Err(CoreError::not_found("Organization", author_id).into())
            }
        }
        AuthorType::User => {
            store
                .find_employee_by_id(author_id)
                .await?
                .ok_or_else(|| CoreError::Unauthorized("No such user".into()))?;
            let organization_id = store
                .find_user_organization(author_id)
                .await?
                .ok_or_else(|| {
                    CoreError::Forbidden("User is not responsible for any organization".into())
                })?;
            Ok(organization_id)
        }
    }
}

/// Create a bid in status `Created` with decision `None` at version 1.
pub async fn create_bid(store: &dyn Store, input: CreateBid) -> AppResult<Bid> {
    input.validate()?;

    let organization_id = resolve_bidder(store, input.author_type, input.author_id).await?;
    let tender = find_tender(store, input.tender_id).await?;
    if tender.organization_id != organization_id && !tender.status.is_public() {
        return Err(CoreError::Forbidden("Don't have rights".into()).into());
    }

    let bid = store
        .create_bid(&NewBid {
            name: input.name,
            description: input.description,
            tender_id: input.tender_id,
            author_type: input.author_type,
            author_id: input.author_id,
            organization_id,
        })
        .await?;
    tracing::info!(
        bid_id = %bid.id,
        tender_id = %bid.tender_id,
        author_type = %bid.author_type,
        organization_id = %organization_id,
        "Bid created"
    );
    Ok(bid)
}

/// Bids the caller authored as a user.
pub async fn list_user_bids(
    store: &dyn Store,
    username: Option<&str>,
    page: Page,
) -> AppResult<Vec<Bid>> {
    let employee = identify(store, username).await?;
    let filter = BidFilter::AuthoredBy {
        author_id: employee.id,
    };
    Ok(store.list_bids(&filter, page).await?)
}

/// Bids on a tender: published ones plus those of the caller's organization.
pub async fn list_tender_bids(
    store: &dyn Store,
    tender_id: DbId,
    username: Option<&str>,
    page: Page,
) -> AppResult<Vec<Bid>> {
    let employee = identify(store, username).await?;
    let organization_id = store.find_user_organization(employee.id).await?;
    let tender = find_tender(store, tender_id).await?;
    if !tender.status.is_public() {
        ensure_responsible(store, tender.organization_id, &employee.username).await?;
    }

    let filter = BidFilter::OnTender {
        tender_id,
        organization_id,
    };
    Ok(store.list_bids(&filter, page).await?)
}

/// Current status. Unpublished bids are visible to their organization only.
pub async fn bid_status(store: &dyn Store, id: DbId, username: Option<&str>) -> AppResult<BidStatus> {
    let employee = identify(store, username).await?;
    let bid = find_bid(store, id).await?;
    if !bid.status.is_public() {
        ensure_responsible(store, bid.organization_id, &employee.username).await?;
    }
    Ok(bid.status)
}

pub async fn edit_bid_status(
    store: &dyn Store,
    id: DbId,
    username: Option<&str>,
    status: Option<&str>,
) -> AppResult<Bid> {
    let (employee, _) = authorize_bid(store, id, username).await?;
    let status: BidStatus = parse_status(status)?;

    let mut tx = store.begin().await?;
    let current = lock_bid(tx.as_mut(), id).await?;
    let updated = revise_bid(tx.as_mut(), &current, &BidChanges::status(status)).await?;
    tx.commit().await?;

    tracing::info!(
        bid_id = %id,
        from = %current.status,
        to = %updated.status,
        version = updated.version,
        user = %employee.username,
        "Bid status changed"
    );
    Ok(updated)
}

/// Partial edit of name and description.
pub async fn edit_bid(
    store: &dyn Store,
    id: DbId,
    username: Option<&str>,
    input: UpdateBid,
) -> AppResult<Bid> {
    let (employee, _) = authorize_bid(store, id, username).await?;

    if input.is_empty() {
        return Err(AppError::BadRequest("Nothing to update".into()));
    }
    input.validate()?;

    let mut tx = store.begin().await?;
    let current = lock_bid(tx.as_mut(), id).await?;
    let updated = revise_bid(tx.as_mut(), &current, &BidChanges::from(input)).await?;
    tx.commit().await?;

    tracing::info!(bid_id = %id, version = updated.version, user = %employee.username, "Bid edited");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tenderhub_core::bid::BidDecision;

    use super::*;
    use crate::engine::fixtures::World;

    fn user_bid(tender_id: DbId, author_id: DbId) -> CreateBid {
        CreateBid {
            name: "Offer".into(),
            description: "Cheap and fast".into(),
            tender_id,
            author_type: AuthorType::User,
            author_id,
        }
    }

    #[tokio::test]
    async fn organization_author_bids_for_itself() {
        let world = World::new().await;
        let tender = world.published_tender("Roads").await;
        let bid = world.bid_on(&tender, "Offer").await;

        assert_eq!(bid.organization_id, world.other_org.id);
        assert_eq!(bid.status, BidStatus::Created);
        assert_eq!(bid.decision, BidDecision::Pending);
        assert_eq!(bid.approved_count, 0);
        assert_eq!(bid.version, 1);
    }

    #[tokio::test]
    async fn user_author_bids_for_their_organization() {
        let world = World::new().await;
        let tender = world.published_tender("Roads").await;
        let bid = create_bid(&world.store, user_bid(tender.id, world.carol.id))
            .await
            .unwrap();
        assert_eq!(bid.organization_id, world.other_org.id);
        assert_eq!(bid.author_id, world.carol.id);
    }

    #[tokio::test]
    async fn author_resolution_failures() {
        let world = World::new().await;
        let tender = world.published_tender("Roads").await;

        assert_matches!(
            create_bid(&world.store, user_bid(tender.id, uuid::Uuid::new_v4())).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        assert_matches!(
            create_bid(&world.store, user_bid(tender.id, world.dave.id)).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );

        let mut ghost_org = user_bid(tender.id, uuid::Uuid::new_v4());
        ghost_org.author_type = AuthorType::Organization;
        assert_matches!(
            create_bid(&world.store, ghost_org).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Organization", .. }))
        );

        assert_matches!(
            create_bid(&world.store, user_bid(uuid::Uuid::new_v4(), world.carol.id)).await,
            Err(AppError::Core(CoreError::NotFound { entity: "Tender", .. }))
        );
    }

    #[tokio::test]
    async fn unpublished_tender_accepts_only_its_own_organization() {
        let world = World::new().await;
        let draft = world.draft_tender("Draft").await;

        assert_matches!(
            create_bid(&world.store, user_bid(draft.id, world.carol.id)).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        let own = create_bid(&world.store, user_bid(draft.id, world.bob.id))
            .await
            .unwrap();
        assert_eq!(own.organization_id, world.org.id);
    }

    #[tokio::test]
    async fn tender_listing_hides_foreign_unpublished_bids() {
        let world = World::new().await;
        let tender = world.published_tender("Roads").await;
        let hidden = world.bid_on(&tender, "B hidden").await;
        let shown = world.bid_on(&tender, "A shown").await;
        edit_bid_status(&world.store, shown.id, Some("carol"), Some("Published"))
            .await
            .unwrap();

        let for_alice = list_tender_bids(&world.store, tender.id, Some("alice"), Page::default())
            .await
            .unwrap();
        assert_eq!(for_alice.len(), 1);
        assert_eq!(for_alice[0].id, shown.id);

        let for_carol = list_tender_bids(&world.store, tender.id, Some("carol"), Page::default())
            .await
            .unwrap();
        let ids: Vec<DbId> = for_carol.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![shown.id, hidden.id]);
    }

    #[tokio::test]
    async fn bids_on_a_draft_tender_need_tender_rights() {
        let world = World::new().await;
        let draft = world.draft_tender("Draft").await;
        assert_matches!(
            list_tender_bids(&world.store, draft.id, Some("carol"), Page::default()).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        assert!(list_tender_bids(&world.store, draft.id, Some("alice"), Page::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn my_bids_are_those_authored_by_me() {
        let world = World::new().await;
        let tender = world.published_tender("Roads").await;
        world.user_bid_on(&tender, "Mine").await;
        world.bid_on(&tender, "Organization's").await;

        let mine = list_user_bids(&world.store, Some("carol"), Page::default())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "Mine");
    }

    #[tokio::test]
    async fn bid_status_visibility_and_edit_rights() {
        let world = World::new().await;
        let tender = world.published_tender("Roads").await;
        let bid = world.bid_on(&tender, "Offer").await;

        assert_matches!(
            bid_status(&world.store, bid.id, Some("alice")).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        assert_eq!(
            bid_status(&world.store, bid.id, Some("carol")).await.unwrap(),
            BidStatus::Created
        );
        assert_matches!(
            edit_bid_status(&world.store, bid.id, Some("alice"), Some("Published")).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
        assert_matches!(
            edit_bid_status(&world.store, bid.id, Some("carol"), Some("Closed")).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );

        let published = edit_bid_status(&world.store, bid.id, Some("carol"), Some("Published"))
            .await
            .unwrap();
        assert_eq!(published.version, 2);
        assert_eq!(
            bid_status(&world.store, bid.id, Some("alice")).await.unwrap(),
            BidStatus::Published
        );
    }

    #[tokio::test]
    async fn edit_bid_snapshots_then_updates() {
        let world = World::new().await;
        let tender = world.published_tender("Roads").await;
        let bid = world.bid_on(&tender, "Offer").await;

        let updated = edit_bid(
            &world.store,
            bid.id,
            Some("carol"),
            UpdateBid {
                description: Some("Even cheaper".into()),
                ..UpdateBid::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Offer");
        assert_eq!(updated.description, "Even cheaper");
        assert_eq!(updated.version, 2);

        let versions = world.store.list_bid_versions(bid.id).await.unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].description, bid.description);

        assert_matches!(
            edit_bid(&world.store, bid.id, Some("carol"), UpdateBid::default()).await,
            Err(AppError::BadRequest(_))
        );
        assert_eq!(world.bid(&bid).await.version, 2);
    }
}
