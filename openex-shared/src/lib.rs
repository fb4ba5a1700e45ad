pub mod events;
pub mod redacted;

pub use events::MarketEvent;
pub use redacted::Redacted;
