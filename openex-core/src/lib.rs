pub mod identity;
pub mod repository;

pub use identity::{Role, Session, SessionResolver, User};
pub use repository::UserRepository;

/// Failure talking to the backing service (the external listing/user store).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
