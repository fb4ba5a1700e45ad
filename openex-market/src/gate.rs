use crate::models::NewRequest;
use chrono::Utc;
use openex_core::repository::UserRepository;
use openex_core::StoreError;
use openex_shared::events::ContactUpdatedEvent;
use openex_shared::MarketEvent;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use uuid::Uuid;

/// Where the gate stands for this session. `Unknown` covers the window before
/// the first contact check resolves; `Valid` never regresses within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unknown,
    Invalid,
    Valid,
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("phone number is required")]
    Empty,

    #[error("phone number must be exactly 10 digits")]
    Format,

    #[error("backing service failure: {0}")]
    Store(#[from] StoreError),
}

/// The UI rule: exactly 10 ASCII digits. An e-mail address (the legacy seed
/// value) fails this by construction.
pub fn is_valid_contact(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Blocks transaction-initiating actions until the actor has a usable phone
/// number on file, then hands the blocked transaction back for replay.
///
/// One gate per session: the cached verdict belongs to a single actor.
pub struct ContactGate {
    users: Arc<dyn UserRepository>,
    events: Option<broadcast::Sender<MarketEvent>>,
    state: RwLock<GateState>,
    deferred: Mutex<Option<NewRequest>>,
}

impl ContactGate {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            events: None,
            state: RwLock::new(GateState::Unknown),
            deferred: Mutex::new(None),
        }
    }

    /// Publish `ContactUpdated` on the given channel when the gate opens.
    pub fn with_events(
        users: Arc<dyn UserRepository>,
        events: broadcast::Sender<MarketEvent>,
    ) -> Self {
        Self {
            events: Some(events),
            ..Self::new(users)
        }
    }

    /// Fetch the stored contact and settle the gate. A collaborator failure
    /// settles `Invalid`: over-prompting beats letting an unreachable buyer
    /// transact.
    pub async fn refresh(&self, user_id: Uuid) -> GateState {
        let checked = match self.users.get_user(user_id).await {
            Ok(Some(user)) => match &user.contact_details {
                Some(contact) if is_valid_contact(contact.expose()) => GateState::Valid,
                _ => GateState::Invalid,
            },
            Ok(None) => GateState::Invalid,
            Err(e) => {
                tracing::warn!(%user_id, "contact check failed, treating as invalid: {}", e);
                GateState::Invalid
            }
        };

        let mut state = self.state.write().await;
        if *state != GateState::Valid {
            *state = checked;
        }
        *state
    }

    /// Cached verdict; no network once settled. `Unknown` answers false.
    pub async fn has_valid_contact(&self) -> bool {
        *self.state.read().await == GateState::Valid
    }

    pub async fn state(&self) -> GateState {
        *self.state.read().await
    }

    /// Record the transaction to resume once the contact update lands. At
    /// most one is held; the newest wins.
    pub async fn defer(&self, request: NewRequest) {
        *self.deferred.lock().await = Some(request);
    }

    pub async fn take_deferred(&self) -> Option<NewRequest> {
        self.deferred.lock().await.take()
    }

    /// Validate and persist a new contact value. Format failures are resolved
    /// locally; a store failure leaves the gate `Invalid` and surfaces the
    /// error. On success the gate opens and the stored continuation (if any)
    /// is handed back for the caller to replay.
    pub async fn submit_update(
        &self,
        user_id: Uuid,
        value: &str,
    ) -> Result<Option<NewRequest>, GateError> {
        if value.is_empty() {
            return Err(GateError::Empty);
        }
        if !is_valid_contact(value) {
            return Err(GateError::Format);
        }

        self.users.update_contact(user_id, value).await?;
        *self.state.write().await = GateState::Valid;
        if let Some(tx) = &self.events {
            let _ = tx.send(MarketEvent::ContactUpdated(ContactUpdatedEvent {
                user_id,
                timestamp: Utc::now().timestamp(),
            }));
        }
        tracing::info!(%user_id, "contact details updated, gate open");

        Ok(self.deferred.lock().await.take())
    }
}
