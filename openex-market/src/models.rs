use chrono::{DateTime, Utc};
use openex_catalog::{Listing, ListingStatus};
use openex_core::identity::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction flavor, derived from the listing: `Buy` for priced `sell`
/// listings, `Exchange` for barter listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Buy,
    Exchange,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// A buyer's ask against a listing, awaiting the seller's decision.
/// `pending` transitions once, to `approved` or `rejected`; both terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub id: Uuid,
    pub buyer_id: Uuid,
    /// Denormalized from the listing owner at creation time.
    pub seller_id: Uuid,
    pub listing_id: Uuid,
    /// The item offered in return; exchange requests only.
    pub offered_listing_id: Option<Uuid>,
    pub kind: RequestKind,
    pub quantity: u32,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRequest {
    pub fn new(
        buyer_id: Uuid,
        seller_id: Uuid,
        listing_id: Uuid,
        kind: RequestKind,
        quantity: u32,
        offered_listing_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            buyer_id,
            seller_id,
            listing_id,
            offered_listing_id,
            kind,
            quantity,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: RequestStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Contact details revealed to both parties once a request is approved.
#[derive(Debug, Clone, Serialize)]
pub struct ContactCard {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub hostel_id: Uuid,
}

impl From<&User> for ContactCard {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.contact_details.as_ref().map(|c| c.expose().clone()),
            hostel_id: user.hostel_id,
        }
    }
}

/// Result of a seller decision, for display. Quantity, listing status and
/// contact cards are only present on approval.
#[derive(Debug)]
pub struct DecisionOutcome {
    pub request: TransactionRequest,
    pub remaining_quantity: Option<u32>,
    pub listing_status: Option<ListingStatus>,
    pub buyer_contact: Option<ContactCard>,
    pub seller_contact: Option<ContactCard>,
}

/// Parameters for opening a request. Also serves as the deferred-continuation
/// payload when the contact gate blocks the transaction.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub listing_id: Uuid,
    pub quantity: u32,
    pub offered_listing_id: Option<Uuid>,
}

impl NewRequest {
    pub fn buy(listing_id: Uuid, quantity: u32) -> Self {
        Self {
            listing_id,
            quantity,
            offered_listing_id: None,
        }
    }

    pub fn exchange(listing_id: Uuid, quantity: u32, offered_listing_id: Uuid) -> Self {
        Self {
            listing_id,
            quantity,
            offered_listing_id: Some(offered_listing_id),
        }
    }
}

/// One request with its listing snapshot, for display.
#[derive(Debug, Clone)]
pub struct RequestView {
    pub request: TransactionRequest,
    pub listing: Option<Listing>,
}

/// All requests visible to an actor, partitioned by their role in each.
#[derive(Debug, Default)]
pub struct RequestLedger {
    pub as_seller: Vec<RequestView>,
    pub as_buyer: Vec<RequestView>,
}
