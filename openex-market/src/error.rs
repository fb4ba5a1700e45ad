use crate::models::RequestStatus;
use openex_core::identity::IdentityError;
use openex_core::StoreError;

/// Everything that can go wrong in the request lifecycle. Validation arms are
/// resolved locally without a round trip; `Network` carries the collaborator
/// failure verbatim.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("a valid phone number is required before transacting")]
    ContactRequired,

    #[error("a pending request for this listing already exists")]
    DuplicatePendingRequest,

    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    #[error("not authorized to act on this request")]
    NotAuthorized,

    #[error("request is already {0:?}")]
    AlreadyDecided(RequestStatus),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("backing service failure: {0}")]
    Network(#[from] StoreError),
}

impl From<IdentityError> for RequestError {
    fn from(err: IdentityError) -> Self {
        RequestError::AuthenticationRequired(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Callers resolving a bearer token ahead of a request operation bubble
    // the failure through this conversion.
    #[test]
    fn identity_failures_map_to_authentication_required() {
        let source = IdentityError::AuthenticationRequired("token expired".to_string());
        let err = RequestError::from(source);

        match err {
            RequestError::AuthenticationRequired(reason) => {
                assert!(reason.contains("token expired"));
            }
            other => panic!("unexpected arm: {:?}", other),
        }
    }

    #[test]
    fn store_failures_map_to_network() {
        let err = RequestError::from(StoreError::Unavailable("timeout".to_string()));
        assert!(matches!(err, RequestError::Network(_)));
    }
}
