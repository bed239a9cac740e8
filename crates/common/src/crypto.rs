//! Password hashing shared across Marquee crates
//!
//! Argon2id with a random salt per password, stored as a PHC string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed")]
    HashingFailed,
    #[error("Password does not match")]
    Mismatch,
    #[error("Stored password hash is malformed")]
    InvalidHashFormat,
}

/// Hash a plaintext password into a PHC string (`$argon2id$v=19$...`).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// Verify a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

/// Valid PHC string that no password matches. Unknown accounts are verified
/// against it so that every rejected login costs one Argon2 run.
const UNKNOWN_ACCOUNT_HASH: &str = concat!(
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$",
    "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
);

/// [`hash_password`] on the blocking pool
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| PasswordError::HashingFailed)?
}

/// [`verify_password`] on the blocking pool
pub async fn verify_password_blocking(
    password: String,
    stored_hash: String,
) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|_| PasswordError::HashingFailed)?
}

/// Spend one verification for an account that does not exist.
///
/// Always answers [`PasswordError::Mismatch`].
pub async fn reject_unknown_account(password: String) -> PasswordError {
    match verify_password_blocking(password, UNKNOWN_ACCOUNT_HASH.to_string()).await {
        Err(PasswordError::HashingFailed) => PasswordError::HashingFailed,
        _ => PasswordError::Mismatch,
    }
}
