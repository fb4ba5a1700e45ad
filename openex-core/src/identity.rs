use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use openex_shared::Redacted;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A marketplace account. Roles are not exclusive: every user can both list
/// items and request them; `Admin` additionally moderates listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// None until the one-time contact update. Legacy accounts were seeded
    /// with the signup e-mail here, which never passes phone validation.
    pub contact_details: Option<Redacted<String>>,
    pub role: Role,
    pub hostel_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, hostel_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            contact_details: None,
            role: Role::User,
            hostel_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_contact(&mut self, value: impl Into<String>) {
        self.contact_details = Some(Redacted(value.into()));
        self.updated_at = Utc::now();
    }
}

/// Claims carried in the bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: Option<String>,
    pub role: Role,
    pub exp: usize,
}

/// Resolved actor context, passed explicitly to every operation instead of
/// being read from ambient storage at call sites.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("authentication required: {0}")]
    AuthenticationRequired(String),
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Issues and verifies the bearer tokens attached to every call.
pub struct SessionResolver {
    secret: String,
    expiration_seconds: u64,
}

impl SessionResolver {
    pub fn new(secret: impl Into<String>, expiration_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_seconds,
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, IdentityError> {
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: Some(user.email.clone()),
            role: user.role,
            exp: (Utc::now() + Duration::seconds(self.expiration_seconds as i64)).timestamp()
                as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| IdentityError::Encoding(e.to_string()))
    }

    /// Any decode failure (signature, expiry, malformed subject) is reported
    /// as `AuthenticationRequired` rather than distinguished for the caller.
    pub fn resolve(&self, bearer: &str) -> Result<Session, IdentityError> {
        let token = bearer.strip_prefix("Bearer ").unwrap_or(bearer);

        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            tracing::debug!("bearer token rejected: {}", e);
            IdentityError::AuthenticationRequired(e.to_string())
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| {
            IdentityError::AuthenticationRequired("malformed token subject".to_string())
        })?;

        Ok(Session {
            user_id,
            email: data.claims.email,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new("Asha", "asha@campus.edu", Uuid::new_v4())
    }

    #[test]
    fn issue_then_resolve_round_trip() {
        let resolver = SessionResolver::new("unit-test-secret", 3600);
        let user = sample_user();

        let token = resolver.issue(&user).unwrap();
        let session = resolver.resolve(&token).unwrap();

        assert_eq!(session.user_id, user.id);
        assert_eq!(session.role, Role::User);
        assert_eq!(session.email.as_deref(), Some("asha@campus.edu"));
        assert!(!session.is_admin());
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let resolver = SessionResolver::new("unit-test-secret", 3600);
        let user = sample_user();

        let token = resolver.issue(&user).unwrap();
        let session = resolver.resolve(&format!("Bearer {}", token)).unwrap();
        assert_eq!(session.user_id, user.id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let resolver = SessionResolver::new("secret-a", 3600);
        let other = SessionResolver::new("secret-b", 3600);
        let token = resolver.issue(&sample_user()).unwrap();

        assert!(matches!(
            other.resolve(&token),
            Err(IdentityError::AuthenticationRequired(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let resolver = SessionResolver::new("unit-test-secret", 3600);
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            email: None,
            role: Role::User,
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("unit-test-secret".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            resolver.resolve(&token),
            Err(IdentityError::AuthenticationRequired(_))
        ));
    }
}
