//! Concrete authentication backend
//!
//! Bundles the issuer, both verifiers and the session recorder built from
//! one `AuthConfig`.

use std::sync::Arc;

use axum::http::HeaderMap;
use marquee_common::DocumentStore;

use crate::claims::{Identity, TokenPair};
use crate::config::AuthConfig;
use crate::context::RequestIdentity;
use crate::error::{AuthError, TokenError};
use crate::issuer::TokenIssuer;
use crate::jwt::extract_token;
use crate::session::SessionRecorder;
use crate::verifier::TokenVerifier;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    config: AuthConfig,
    issuer: TokenIssuer,
    access: TokenVerifier,
    refresh: TokenVerifier,
    sessions: SessionRecorder,
}

impl AuthBackend {
    pub fn new(config: AuthConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            issuer: TokenIssuer::new(config.clone()),
            access: TokenVerifier::access(&config),
            refresh: TokenVerifier::refresh(&config),
            sessions: SessionRecorder::new(store, config.session_write_timeout()),
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn access_verifier(&self) -> &TokenVerifier {
        &self.access
    }

    pub fn refresh_verifier(&self) -> &TokenVerifier {
        &self.refresh
    }

    pub fn sessions(&self) -> &SessionRecorder {
        &self.sessions
    }

    /// Verify the access token carried by the request headers
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<RequestIdentity, AuthError> {
        let token = extract_token(headers)?;
        let claims = self.access.verify(token)?;
        Ok(RequestIdentity::from_claims(claims))
    }

    /// Issue a token pair and mirror it onto the user record.
    ///
    /// A failed mirror write is logged; the pair is returned regardless.
    pub async fn start_session(&self, identity: &Identity) -> Result<TokenPair, TokenError> {
        let tokens = self.issuer.issue(identity)?;
        self.sessions.record(&identity.user_id, &tokens).await;
        Ok(tokens)
    }
}
