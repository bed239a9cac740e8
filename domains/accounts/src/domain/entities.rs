//! Domain entities for the accounts domain

use chrono::{DateTime, Utc};
use marquee_auth::{Identity, Role};
use marquee_common::Genre;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored user record.
///
/// `token` and `refresh_token` mirror the most recently issued pair; they
/// are written by the session recorder and never read for verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub favourite_genres: Vec<Genre>,
}

impl User {
    /// Create a new `USER`-role account from an already hashed password
    pub fn new(
        first_name: String,
        last_name: String,
        email: &str,
        password_hash: String,
        favourite_genres: Vec<Genre>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: Uuid::new_v4().simple().to_string(),
            first_name,
            last_name,
            email: normalize_email(email),
            password: password_hash,
            role: Role::User,
            created_at: now,
            updated_at: now,
            token: None,
            refresh_token: None,
            favourite_genres,
        }
    }

    /// Snapshot of the fields carried in issued tokens
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
        }
    }
}

/// Emails are matched case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
