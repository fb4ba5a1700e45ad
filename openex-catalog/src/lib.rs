pub mod favorites;
pub mod janitor;
pub mod listing;
pub mod moderation;
pub mod repository;

pub use favorites::FavoriteSet;
pub use listing::{Listing, ListingKind, ListingStatus, StockError};
pub use repository::{FavoriteRepository, ListingRepository};

#[cfg(test)]
pub(crate) mod testutil;
