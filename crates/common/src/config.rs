//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Missing secrets are a
//! startup failure, never a per-request error.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default prompt sent to the review classifier; `{rankings}` is replaced
/// with the comma-separated ranking names.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "Classify the sentiment of the movie review below. \
Answer with exactly one of these words: {rankings}. \
Do not add punctuation or any other text. Review: ";

/// Configuration errors detected at boot
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("SECRET_ACCESS_KEY and SECRET_REFRESH_KEY must differ")]
    SecretsNotDistinct,
}

/// Which document store backs the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Which review classifier implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierProvider {
    OpenAi,
    Mock,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct Config {
    /// Storage
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub store_timeout: Duration,

    /// Token signing
    pub secret_access_key: String,
    pub secret_refresh_key: String,
    pub token_issuer: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_hours: i64,
    pub session_write_timeout: Duration,

    /// Review classification
    pub classifier_provider: ClassifierProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub prompt_template: String,

    /// Runtime configuration
    pub log_format: LogFormat,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("store_backend", &self.store_backend)
            .field("store_timeout", &self.store_timeout)
            .field("token_issuer", &self.token_issuer)
            .field("access_token_ttl_hours", &self.access_token_ttl_hours)
            .field("refresh_token_ttl_hours", &self.refresh_token_ttl_hours)
            .field("session_write_timeout", &self.session_write_timeout)
            .field("classifier_provider", &self.classifier_provider)
            .field("openai_model", &self.openai_model)
            .field("log_format", &self.log_format)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let store_backend = match var("STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    reason: format!("unknown backend '{}'", other),
                })
            }
        };

        let database_url = var("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let secret_access_key = required("SECRET_ACCESS_KEY")?;
        let secret_refresh_key = required("SECRET_REFRESH_KEY")?;
        if secret_access_key == secret_refresh_key {
            return Err(ConfigError::SecretsNotDistinct);
        }

        let classifier_provider = match var("CLASSIFIER_PROVIDER").as_deref() {
            None | Some("openai") => ClassifierProvider::OpenAi,
            Some("mock") => ClassifierProvider::Mock,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "CLASSIFIER_PROVIDER",
                    reason: format!("unknown provider '{}'", other),
                })
            }
        };

        let openai_api_key = var("OPENAI_API_KEY");
        if classifier_provider == ClassifierProvider::OpenAi && openai_api_key.is_none() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            store_backend,
            database_url,
            store_timeout: Duration::from_secs(parse_or(&var, "STORE_TIMEOUT_SECS", 10)?),

            secret_access_key,
            secret_refresh_key,
            token_issuer: var("TOKEN_ISSUER").unwrap_or_else(|| "marquee".to_string()),
            access_token_ttl_hours: parse_or(&var, "ACCESS_TOKEN_TTL_HOURS", 24)?,
            refresh_token_ttl_hours: parse_or(&var, "REFRESH_TOKEN_TTL_HOURS", 24 * 7)?,
            session_write_timeout: Duration::from_secs(parse_or(
                &var,
                "SESSION_WRITE_TIMEOUT_SECS",
                100,
            )?),

            classifier_provider,
            openai_api_key,
            openai_model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            openai_base_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            prompt_template: var("PROMPT_TEMPLATE")
                .unwrap_or_else(|| DEFAULT_PROMPT_TEMPLATE.to_string()),

            log_format,
            port: parse_or(&var, "PORT", 8080)?,
        })
    }
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}
