use crate::identity::User;
use crate::StoreResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Access to user profiles held by the backing service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Persist a new contact value on the profile and return the updated user.
    async fn update_contact(&self, id: Uuid, contact: &str) -> StoreResult<User>;
}
