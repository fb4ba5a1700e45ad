use crate::listing::{Listing, ListingStatus};
use crate::repository::ListingRepository;
use openex_core::identity::Session;
use openex_core::StoreError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("admin access required")]
    NotAuthorized,

    #[error("listing not found: {0}")]
    NotFound(Uuid),

    #[error("listing is {0:?}; only pending listings can be moderated")]
    AlreadyModerated(ListingStatus),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Approve a pending listing, opening it for requests.
pub async fn approve_listing(
    repo: &dyn ListingRepository,
    session: &Session,
    listing_id: Uuid,
) -> Result<Listing, ModerationError> {
    moderate(repo, session, listing_id, ListingStatus::Approved).await
}

/// Reject a pending listing. Rejected listings are later garbage-collected
/// by the janitor once past the retention window.
pub async fn reject_listing(
    repo: &dyn ListingRepository,
    session: &Session,
    listing_id: Uuid,
) -> Result<Listing, ModerationError> {
    moderate(repo, session, listing_id, ListingStatus::Rejected).await
}

async fn moderate(
    repo: &dyn ListingRepository,
    session: &Session,
    listing_id: Uuid,
    verdict: ListingStatus,
) -> Result<Listing, ModerationError> {
    if !session.is_admin() {
        return Err(ModerationError::NotAuthorized);
    }

    let mut listing = repo
        .get_listing(listing_id)
        .await?
        .ok_or(ModerationError::NotFound(listing_id))?;

    if listing.status != ListingStatus::Pending {
        return Err(ModerationError::AlreadyModerated(listing.status));
    }

    listing.update_status(verdict);
    repo.save_listing(&listing).await?;
    tracing::info!(%listing_id, ?verdict, "listing moderated");

    Ok(listing)
}
