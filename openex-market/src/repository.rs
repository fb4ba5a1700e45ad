use crate::models::TransactionRequest;
use crate::services::{Service, ServiceStatus, ServiceTask};
use async_trait::async_trait;
use openex_core::StoreResult;
use uuid::Uuid;

/// Access to transaction requests held by the backing service.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create_request(&self, request: &TransactionRequest) -> StoreResult<()>;

    async fn get_request(&self, id: Uuid) -> StoreResult<Option<TransactionRequest>>;

    async fn save_request(&self, request: &TransactionRequest) -> StoreResult<()>;

    /// Every request in which the user appears as buyer or seller.
    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<TransactionRequest>>;

    /// The buyer's still-pending request against a listing, if any. This is
    /// the authoritative duplicate check at creation time.
    async fn find_pending(
        &self,
        buyer_id: Uuid,
        listing_id: Uuid,
    ) -> StoreResult<Option<TransactionRequest>>;
}

/// Access to service offerings and tasks held by the backing service.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn save_service(&self, service: &Service) -> StoreResult<()>;

    async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>>;

    async fn list_services_with_status(&self, status: ServiceStatus) -> StoreResult<Vec<Service>>;

    async fn save_task(&self, task: &ServiceTask) -> StoreResult<()>;

    async fn get_task(&self, id: Uuid) -> StoreResult<Option<ServiceTask>>;

    async fn list_open_tasks(&self) -> StoreResult<Vec<ServiceTask>>;
}
