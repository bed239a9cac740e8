//! Token verification
//!
//! One verifier per secret domain. An access verifier never accepts a
//! refresh token and vice versa, since each holds only its own secret.

use chrono::{DateTime, Utc};

use crate::claims::Claims;
use crate::config::{AuthConfig, SigningSecret};
use crate::error::VerificationError;
use crate::jwt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone)]
pub struct TokenVerifier {
    kind: TokenKind,
    secret: SigningSecret,
    issuer: String,
}

impl TokenVerifier {
    pub fn access(config: &AuthConfig) -> Self {
        Self {
            kind: TokenKind::Access,
            secret: config.access_secret().clone(),
            issuer: config.issuer().to_string(),
        }
    }

    pub fn refresh(config: &AuthConfig) -> Self {
        Self {
            kind: TokenKind::Refresh,
            secret: config.refresh_secret().clone(),
            issuer: config.issuer().to_string(),
        }
    }

    /// Verify a token against the current clock
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`. Same token and instant give the same result.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, VerificationError> {
        if token.trim().is_empty() {
            return Err(VerificationError::MissingToken);
        }

        jwt::decode_and_verify(token, &self.secret, &self.issuer, now).map_err(|reason| {
            tracing::debug!(kind = ?self.kind, reason = %reason, "Token verification failed");
            reason
        })
    }
}
