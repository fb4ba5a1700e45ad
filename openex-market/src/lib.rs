pub mod error;
pub mod gate;
pub mod manager;
pub mod models;
pub mod repository;
pub mod services;

pub use error::RequestError;
pub use gate::{ContactGate, GateError, GateState};
pub use manager::RequestManager;
pub use models::{
    ContactCard, Decision, DecisionOutcome, NewRequest, RequestKind, RequestLedger, RequestStatus,
    RequestView, TransactionRequest,
};
pub use repository::{RequestRepository, ServiceRepository};
pub use services::{Service, ServiceBoard, ServiceError, ServiceStatus, ServiceTask, TaskStatus};
