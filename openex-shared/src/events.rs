use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct RequestCreatedEvent {
    pub request_id: Uuid,
    pub listing_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub quantity: u32,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct RequestDecidedEvent {
    pub request_id: Uuid,
    pub listing_id: Uuid,
    pub seller_id: Uuid,
    pub approved: bool,
    /// Listing quantity after the decision; None on rejection.
    pub remaining_quantity: Option<u32>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ListingSoldEvent {
    pub listing_id: Uuid,
    pub seller_id: Uuid,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ContactUpdatedEvent {
    pub user_id: Uuid,
    pub timestamp: i64,
}

/// Envelope carried on the in-process event bus.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    RequestCreated(RequestCreatedEvent),
    RequestDecided(RequestDecidedEvent),
    ListingSold(ListingSoldEvent),
    ContactUpdated(ContactUpdatedEvent),
}
