//! Token pair issuance

use chrono::{DateTime, TimeDelta, Utc};

use crate::claims::{Claims, Identity, TokenPair};
use crate::config::{AuthConfig, SigningSecret};
use crate::error::TokenError;
use crate::jwt;

/// Mints access and refresh tokens. Performs no persistence.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: AuthConfig,
}

impl TokenIssuer {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue a token pair at the current instant
    pub fn issue(&self, identity: &Identity) -> Result<TokenPair, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token pair as of `now`. Both tokens share the issue instant.
    pub fn issue_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let (access_token, access_expires_at) = self.mint(
            identity,
            now,
            self.config.access_ttl(),
            self.config.access_secret(),
        )?;
        let (refresh_token, refresh_expires_at) = self.mint(
            identity,
            now,
            self.config.refresh_ttl(),
            self.config.refresh_secret(),
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    fn mint(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        ttl: TimeDelta,
        secret: &SigningSecret,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let claims = Claims::new(identity, self.config.issuer(), now, ttl);
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| TokenError::Encoding("expiry out of range".to_string()))?;
        let token = jwt::encode(&claims, secret)?;
        Ok((token, expires_at))
    }
}
