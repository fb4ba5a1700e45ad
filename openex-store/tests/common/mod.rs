use openex_catalog::{Listing, ListingKind, ListingStatus};
use openex_core::identity::{Session, SessionResolver, User};
use openex_market::{ContactGate, RequestManager};
use openex_store::{EventBus, MemoryStore};
use std::sync::Arc;
use uuid::Uuid;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub manager: RequestManager,
    pub bus: EventBus,
    pub resolver: SessionResolver,
    pub hostel_id: Uuid,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let bus = EventBus::default();
    let manager = RequestManager::new(
        store.clone(),
        store.clone(),
        store.clone(),
        bus.sender(),
    );
    Harness {
        store,
        manager,
        bus,
        resolver: SessionResolver::new("integration-test-secret", 3600),
        hostel_id: Uuid::new_v4(),
    }
}

impl Harness {
    /// Seed a user and resolve a session for them through the real token
    /// path, the way a caller would.
    pub async fn user(&self, name: &str, contact: Option<&str>) -> (User, Session) {
        let mut user = User::new(name, format!("{}@campus.edu", name.to_lowercase()), self.hostel_id);
        if let Some(contact) = contact {
            user.set_contact(contact);
        }
        self.store.put_user(user.clone()).await;

        let token = self.resolver.issue(&user).unwrap();
        let session = self.resolver.resolve(&token).unwrap();
        (user, session)
    }

    pub async fn approved_listing(
        &self,
        seller: &User,
        kind: ListingKind,
        quantity: u32,
    ) -> Listing {
        let price = match kind {
            ListingKind::Sell => Some(400.0),
            ListingKind::Exchange => None,
        };
        let mut listing = Listing::new(
            seller.id,
            self.hostel_id,
            "Study table",
            "Sturdy, fits a laptop and two books",
            kind,
            price,
            quantity,
        );
        listing.update_status(ListingStatus::Approved);
        self.store.put_listing(listing.clone()).await;
        listing
    }

    /// A gate already opened for an actor with a valid contact on file.
    pub async fn open_gate(&self, session: &Session) -> ContactGate {
        let gate = ContactGate::with_events(self.store.clone(), self.bus.sender());
        gate.refresh(session.user_id).await;
        gate
    }
}
