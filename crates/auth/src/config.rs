//! Authentication configuration

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use marquee_common::{Config, ConfigError};

/// HMAC signing secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Arc<str>);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::from(secret.into()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}

/// Immutable token configuration injected into the issuer and verifiers
#[derive(Debug, Clone)]
pub struct AuthConfig {
    access_secret: SigningSecret,
    refresh_secret: SigningSecret,
    issuer: String,
    access_ttl: TimeDelta,
    refresh_ttl: TimeDelta,
    session_write_timeout: Duration,
}

impl AuthConfig {
    pub const DEFAULT_ISSUER: &'static str = "marquee";

    /// Build a configuration from the two signing secrets.
    ///
    /// Both secrets must be non-empty and distinct.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let access_secret = SigningSecret::new(access_secret);
        let refresh_secret = SigningSecret::new(refresh_secret);

        if access_secret.is_empty() {
            return Err(ConfigError::Missing("SECRET_ACCESS_KEY"));
        }
        if refresh_secret.is_empty() {
            return Err(ConfigError::Missing("SECRET_REFRESH_KEY"));
        }
        if access_secret == refresh_secret {
            return Err(ConfigError::SecretsNotDistinct);
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            issuer: Self::DEFAULT_ISSUER.to_string(),
            access_ttl: TimeDelta::hours(24),
            refresh_ttl: TimeDelta::hours(24 * 7),
            session_write_timeout: Duration::from_secs(100),
        })
    }

    /// Derive the auth configuration from the application configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let access_ttl = ttl_hours("ACCESS_TOKEN_TTL_HOURS", config.access_token_ttl_hours)?;
        let refresh_ttl = ttl_hours("REFRESH_TOKEN_TTL_HOURS", config.refresh_token_ttl_hours)?;

        Ok(
            Self::new(&config.secret_access_key, &config.secret_refresh_key)?
                .with_issuer(&config.token_issuer)
                .with_access_ttl(access_ttl)
                .with_refresh_ttl(refresh_ttl)
                .with_session_write_timeout(config.session_write_timeout),
        )
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_access_ttl(mut self, ttl: TimeDelta) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: TimeDelta) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    pub fn with_session_write_timeout(mut self, timeout: Duration) -> Self {
        self.session_write_timeout = timeout;
        self
    }

    pub fn access_secret(&self) -> &SigningSecret {
        &self.access_secret
    }

    pub fn refresh_secret(&self) -> &SigningSecret {
        &self.refresh_secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn access_ttl(&self) -> TimeDelta {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> TimeDelta {
        self.refresh_ttl
    }

    pub fn session_write_timeout(&self) -> Duration {
        self.session_write_timeout
    }
}

fn ttl_hours(name: &'static str, hours: i64) -> Result<TimeDelta, ConfigError> {
    if hours <= 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be a positive number of hours".to_string(),
        });
    }
    TimeDelta::try_hours(hours).ok_or(ConfigError::Invalid {
        name,
        reason: "out of range".to_string(),
    })
}
