use crate::listing::{Listing, ListingStatus};
use async_trait::async_trait;
use openex_core::StoreResult;
use uuid::Uuid;

/// Access to listings held by the backing service.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn get_listing(&self, id: Uuid) -> StoreResult<Option<Listing>>;

    /// Insert or overwrite a listing.
    async fn save_listing(&self, listing: &Listing) -> StoreResult<()>;

    async fn list_with_status(&self, status: ListingStatus) -> StoreResult<Vec<Listing>>;

    async fn delete_listing(&self, id: Uuid) -> StoreResult<()>;
}

/// Per-user listing bookmarks. Both mutations are idempotent on the server
/// side: double-add and missing-remove are no-ops.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn add_favorite(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()>;

    async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()>;

    async fn list_favorites(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>>;
}
