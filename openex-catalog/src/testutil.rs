use crate::listing::{Listing, ListingStatus};
use crate::repository::ListingRepository;
use async_trait::async_trait;
use openex_core::StoreResult;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Minimal in-memory listing store for module tests.
#[derive(Default)]
pub(crate) struct MemoryListings {
    inner: Mutex<HashMap<Uuid, Listing>>,
}

impl MemoryListings {
    pub(crate) fn insert(&self, listing: Listing) {
        self.inner.lock().unwrap().insert(listing.id, listing);
    }

    pub(crate) fn get(&self, id: Uuid) -> Option<Listing> {
        self.inner.lock().unwrap().get(&id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[async_trait]
impl ListingRepository for MemoryListings {
    async fn get_listing(&self, id: Uuid) -> StoreResult<Option<Listing>> {
        Ok(self.inner.lock().unwrap().get(&id).cloned())
    }

    async fn save_listing(&self, listing: &Listing) -> StoreResult<()> {
        self.inner
            .lock()
            .unwrap()
            .insert(listing.id, listing.clone());
        Ok(())
    }

    async fn list_with_status(&self, status: ListingStatus) -> StoreResult<Vec<Listing>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect())
    }

    async fn delete_listing(&self, id: Uuid) -> StoreResult<()> {
        self.inner.lock().unwrap().remove(&id);
        Ok(())
    }
}
