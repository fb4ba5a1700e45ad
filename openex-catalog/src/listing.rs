use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Sell,
    Exchange,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
    Sold,
}

/// An item offered for sale or exchange, scoped to a hostel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    /// None means the item is exchange-only and carries no price.
    pub price: Option<f64>,
    pub kind: ListingKind,
    pub quantity: u32,
    pub status: ListingStatus,
    pub image: Option<String>,
    pub hostel_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        seller_id: Uuid,
        hostel_id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: ListingKind,
        price: Option<f64>,
        quantity: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            seller_id,
            title: title.into(),
            description: description.into(),
            price,
            kind,
            quantity,
            status: ListingStatus::Pending,
            image: None,
            hostel_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: ListingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    /// Whether buyers may currently open requests against this listing.
    pub fn is_open_for_requests(&self) -> bool {
        self.status == ListingStatus::Approved && self.quantity > 0
    }

    /// Debit sold stock. Quantity is checked against current stock so it can
    /// never go negative; hitting zero flips the listing to `Sold`.
    /// Returns the remaining quantity.
    pub fn debit(&mut self, quantity: u32) -> Result<u32, StockError> {
        if quantity > self.quantity {
            return Err(StockError::InsufficientStock {
                requested: quantity,
                available: self.quantity,
            });
        }

        self.quantity -= quantity;
        if self.quantity == 0 {
            self.status = ListingStatus::Sold;
        }
        self.updated_at = Utc::now();

        Ok(self.quantity)
    }

    /// Return stock to the listing, undoing a debit. A listing that sold out
    /// in the undone debit reopens as `approved`.
    pub fn credit(&mut self, quantity: u32) {
        self.quantity += quantity;
        if self.status == ListingStatus::Sold && self.quantity > 0 {
            self.status = ListingStatus::Approved;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved_listing(quantity: u32) -> Listing {
        let mut listing = Listing::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Desk lamp",
            "Barely used",
            ListingKind::Sell,
            Some(250.0),
            quantity,
        );
        listing.update_status(ListingStatus::Approved);
        listing
    }

    #[test]
    fn debit_reduces_quantity() {
        let mut listing = approved_listing(3);
        let remaining = listing.debit(2).unwrap();

        assert_eq!(remaining, 1);
        assert_eq!(listing.quantity, 1);
        assert_eq!(listing.status, ListingStatus::Approved);
    }

    #[test]
    fn debit_to_zero_marks_sold() {
        let mut listing = approved_listing(1);
        let remaining = listing.debit(1).unwrap();

        assert_eq!(remaining, 0);
        assert_eq!(listing.status, ListingStatus::Sold);
        assert!(!listing.is_open_for_requests());
    }

    #[test]
    fn overdraw_is_rejected_and_leaves_listing_unchanged() {
        let mut listing = approved_listing(1);
        let err = listing.debit(2).unwrap_err();

        match err {
            StockError::InsufficientStock {
                requested,
                available,
            } => {
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
        }
        assert_eq!(listing.quantity, 1);
        assert_eq!(listing.status, ListingStatus::Approved);
    }

    #[test]
    fn credit_undoes_a_sellout() {
        let mut listing = approved_listing(1);
        listing.debit(1).unwrap();
        assert_eq!(listing.status, ListingStatus::Sold);

        listing.credit(1);
        assert_eq!(listing.quantity, 1);
        assert_eq!(listing.status, ListingStatus::Approved);
        assert!(listing.is_open_for_requests());
    }

    #[test]
    fn pending_listing_is_not_open_for_requests() {
        let listing = Listing::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Cycle",
            "Old but working",
            ListingKind::Exchange,
            None,
            1,
        );
        assert_eq!(listing.status, ListingStatus::Pending);
        assert!(!listing.is_open_for_requests());
    }
}
