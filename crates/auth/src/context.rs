//! Request-scoped identity

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::claims::{Claims, Identity, Role};
use crate::error::AuthError;

/// Identity published into request extensions after token verification.
///
/// Only the verification path can construct one, so any handler or gate
/// holding a `RequestIdentity` knows the token behind it was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    user_id: String,
    email: String,
    first_name: String,
    last_name: String,
    role: Role,
}

impl RequestIdentity {
    pub(crate) fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            role: claims.role,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn to_identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
        }
    }
}

/// Reads the identity the `authenticate` layer published.
///
/// Rejects with `IdentityMissing` (400) when the route was wired without
/// the layer.
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .ok_or(AuthError::IdentityMissing)
    }
}
