use async_trait::async_trait;
use openex_catalog::repository::{FavoriteRepository, ListingRepository};
use openex_catalog::{Listing, ListingStatus};
use openex_core::identity::User;
use openex_core::repository::UserRepository;
use openex_core::{StoreError, StoreResult};
use openex_market::repository::{RequestRepository, ServiceRepository};
use openex_market::services::{Service, ServiceStatus, ServiceTask};
use openex_market::TransactionRequest;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory stand-in for the external backing service, implementing every
/// repository trait. Used by tests and anywhere a real store isn't wired up.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    listings: RwLock<HashMap<Uuid, Listing>>,
    requests: RwLock<HashMap<Uuid, TransactionRequest>>,
    favorites: RwLock<HashSet<(Uuid, Uuid)>>,
    services: RwLock<HashMap<Uuid, Service>>,
    tasks: RwLock<HashMap<Uuid, ServiceTask>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn put_listing(&self, listing: Listing) {
        self.listings.write().await.insert(listing.id, listing);
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_contact(&self, id: Uuid, contact: &str) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        user.set_contact(contact);
        Ok(user.clone())
    }
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn get_listing(&self, id: Uuid) -> StoreResult<Option<Listing>> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn save_listing(&self, listing: &Listing) -> StoreResult<()> {
        self.listings
            .write()
            .await
            .insert(listing.id, listing.clone());
        Ok(())
    }

    async fn list_with_status(&self, status: ListingStatus) -> StoreResult<Vec<Listing>> {
        Ok(self
            .listings
            .read()
            .await
            .values()
            .filter(|l| l.status == status)
            .cloned()
            .collect())
    }

    async fn delete_listing(&self, id: Uuid) -> StoreResult<()> {
        self.listings.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl RequestRepository for MemoryStore {
    async fn create_request(&self, request: &TransactionRequest) -> StoreResult<()> {
        self.requests
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn get_request(&self, id: Uuid) -> StoreResult<Option<TransactionRequest>> {
        Ok(self.requests.read().await.get(&id).cloned())
    }

    async fn save_request(&self, request: &TransactionRequest) -> StoreResult<()> {
        self.requests
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<TransactionRequest>> {
        let mut found: Vec<TransactionRequest> = self
            .requests
            .read()
            .await
            .values()
            .filter(|r| r.buyer_id == user_id || r.seller_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        Ok(found)
    }

    async fn find_pending(
        &self,
        buyer_id: Uuid,
        listing_id: Uuid,
    ) -> StoreResult<Option<TransactionRequest>> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .find(|r| r.buyer_id == buyer_id && r.listing_id == listing_id && r.is_pending())
            .cloned())
    }
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn save_service(&self, service: &Service) -> StoreResult<()> {
        self.services
            .write()
            .await
            .insert(service.id, service.clone());
        Ok(())
    }

    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        Ok(self.services.read().await.get(&id).cloned())
    }

    async fn list_services_with_status(&self, status: ServiceStatus) -> StoreResult<Vec<Service>> {
        Ok(self
            .services
            .read()
            .await
            .values()
            .filter(|s| s.status == status)
            .cloned()
            .collect())
    }

    async fn save_task(&self, task: &ServiceTask) -> StoreResult<()> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(())
    }

    async fn get_task(&self, id: Uuid) -> StoreResult<Option<ServiceTask>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_open_tasks(&self) -> StoreResult<Vec<ServiceTask>> {
        let mut open: Vec<ServiceTask> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.is_open())
            .cloned()
            .collect();
        open.sort_by_key(|t| t.created_at);
        Ok(open)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn add_favorite(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()> {
        self.favorites.write().await.insert((user_id, listing_id));
        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()> {
        self.favorites.write().await.remove(&(user_id, listing_id));
        Ok(())
    }

    async fn list_favorites(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        Ok(self
            .favorites
            .read()
            .await
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, l)| *l)
            .collect())
    }
}
