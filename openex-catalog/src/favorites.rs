use crate::repository::FavoriteRepository;
use openex_core::StoreResult;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Locally cached favorite set for one user, mirroring the backing service
/// optimistically: mutate the cache first, roll back if the call fails.
pub struct FavoriteSet {
    repo: Arc<dyn FavoriteRepository>,
    cached: RwLock<HashSet<Uuid>>,
}

impl FavoriteSet {
    pub fn new(repo: Arc<dyn FavoriteRepository>) -> Self {
        Self {
            repo,
            cached: RwLock::new(HashSet::new()),
        }
    }

    /// Overwrite the cache from the authoritative list; called on login and
    /// whenever the view is (re)mounted.
    pub async fn refresh(&self, user_id: Uuid) -> StoreResult<()> {
        let ids = self.repo.list_favorites(user_id).await?;
        *self.cached.write().await = ids.into_iter().collect();
        Ok(())
    }

    pub async fn is_favorite(&self, listing_id: Uuid) -> bool {
        self.cached.read().await.contains(&listing_id)
    }

    pub async fn add(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()> {
        self.cached.write().await.insert(listing_id);

        if let Err(e) = self.repo.add_favorite(user_id, listing_id).await {
            self.cached.write().await.remove(&listing_id);
            tracing::warn!(%listing_id, "favorite add rolled back: {}", e);
            return Err(e);
        }
        Ok(())
    }

    pub async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()> {
        let was_present = self.cached.write().await.remove(&listing_id);

        if let Err(e) = self.repo.remove_favorite(user_id, listing_id).await {
            if was_present {
                self.cached.write().await.insert(listing_id);
            }
            tracing::warn!(%listing_id, "favorite remove rolled back: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use openex_core::StoreError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FlakyFavorites {
        stored: Mutex<HashSet<(Uuid, Uuid)>>,
        fail_next: AtomicBool,
    }

    impl FlakyFavorites {
        fn trip(&self) -> StoreResult<()> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(StoreError::Unavailable("injected outage".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl FavoriteRepository for FlakyFavorites {
        async fn add_favorite(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()> {
            self.trip()?;
            self.stored.lock().unwrap().insert((user_id, listing_id));
            Ok(())
        }

        async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> StoreResult<()> {
            self.trip()?;
            self.stored.lock().unwrap().remove(&(user_id, listing_id));
            Ok(())
        }

        async fn list_favorites(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .filter(|(u, _)| *u == user_id)
                .map(|(_, l)| *l)
                .collect())
        }
    }

    #[tokio::test]
    async fn toggle_round_trip() {
        let repo = Arc::new(FlakyFavorites::default());
        let favorites = FavoriteSet::new(repo.clone());
        let user = Uuid::new_v4();
        let listing = Uuid::new_v4();

        favorites.add(user, listing).await.unwrap();
        assert!(favorites.is_favorite(listing).await);

        favorites.remove(user, listing).await.unwrap();
        assert!(!favorites.is_favorite(listing).await);
    }

    #[tokio::test]
    async fn failed_add_rolls_back_cache() {
        let repo = Arc::new(FlakyFavorites::default());
        let favorites = FavoriteSet::new(repo.clone());
        let user = Uuid::new_v4();
        let listing = Uuid::new_v4();

        repo.fail_next.store(true, Ordering::SeqCst);
        assert!(favorites.add(user, listing).await.is_err());
        assert!(!favorites.is_favorite(listing).await);

        // Next attempt succeeds and sticks.
        favorites.add(user, listing).await.unwrap();
        assert!(favorites.is_favorite(listing).await);
    }

    #[tokio::test]
    async fn failed_remove_restores_cache() {
        let repo = Arc::new(FlakyFavorites::default());
        let favorites = FavoriteSet::new(repo.clone());
        let user = Uuid::new_v4();
        let listing = Uuid::new_v4();

        favorites.add(user, listing).await.unwrap();

        repo.fail_next.store(true, Ordering::SeqCst);
        assert!(favorites.remove(user, listing).await.is_err());
        assert!(favorites.is_favorite(listing).await);
    }

    #[tokio::test]
    async fn refresh_overwrites_cache_from_store() {
        let repo = Arc::new(FlakyFavorites::default());
        let user = Uuid::new_v4();
        let listing = Uuid::new_v4();
        repo.stored.lock().unwrap().insert((user, listing));

        let favorites = FavoriteSet::new(repo);
        assert!(!favorites.is_favorite(listing).await);

        favorites.refresh(user).await.unwrap();
        assert!(favorites.is_favorite(listing).await);
    }
}
