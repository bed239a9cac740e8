//! Axum extractors and middleware for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::backend::AuthBackend;
use crate::context::RequestIdentity;
use crate::error::AuthError;
use crate::gate::{AdminRole, RoleGate, RoleRequirement};

/// Route layer verifying the access token and publishing the identity.
///
/// Install with `axum::middleware::from_fn_with_state(backend, authenticate)`.
pub async fn authenticate(
    State(backend): State<AuthBackend>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = backend.authenticate(request.headers())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Authenticated user extractor.
///
/// Reuses an identity already published for this request, otherwise
/// verifies the token itself and publishes the result.
#[derive(Debug)]
pub struct AuthUser(pub RequestIdentity);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<RequestIdentity>() {
            return Ok(AuthUser(identity.clone()));
        }

        let backend = AuthBackend::from_ref(state);
        let identity = backend.authenticate(&parts.headers)?;
        parts.extensions.insert(identity.clone());

        Ok(AuthUser(identity))
    }
}

/// Authenticated user holding exactly the role `R`.
///
/// Builds on `AuthUser`, so the gate only ever sees a verified identity.
/// Other roles are rejected with 403 FORBIDDEN.
#[derive(Debug)]
pub struct RequireRole<R: RoleRequirement> {
    identity: RequestIdentity,
    _role: PhantomData<fn() -> R>,
}

impl<R: RoleRequirement> RequireRole<R> {
    pub fn identity(&self) -> &RequestIdentity {
        &self.identity
    }

    pub fn into_inner(self) -> RequestIdentity {
        self.identity
    }
}

impl<S, R> FromRequestParts<S> for RequireRole<R>
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
    R: RoleRequirement,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;

        RoleGate::require(R::ROLE).check(&identity)?;

        Ok(RequireRole {
            identity,
            _role: PhantomData,
        })
    }
}

/// Admin-only user extractor
pub type AdminUser = RequireRole<AdminRole>;
