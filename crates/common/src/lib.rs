//! Shared utilities, configuration, and error handling for Marquee
//!
//! This crate provides common functionality used across the Marquee application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - The document store contract consumed by every domain
//! - Password hashing

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod types;

pub use config::{ClassifierProvider, Config, ConfigError, LogFormat, StoreBackend};
pub use crypto::{
    hash_password, hash_password_blocking, reject_unknown_account, verify_password,
    verify_password_blocking, PasswordError,
};
pub use db::{
    collections, from_document, to_document, with_timeout, Condition, Document, DocumentStore,
    Filter, FindOptions, SortOrder, StoreError,
};
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use types::Genre;
