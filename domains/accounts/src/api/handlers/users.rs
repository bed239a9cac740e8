//! User account handlers
//!
//! Implements the account lifecycle:
//! - POST /users         : Register and receive a token pair
//! - POST /users/login   : Exchange credentials for a token pair
//! - POST /users/refresh : Exchange a refresh token for a new pair
//! - GET  /users         : List users (authenticated)

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use marquee_auth::{RequestIdentity, Role, TokenPair};
use marquee_common::{
    hash_password_blocking, reject_unknown_account, verify_password_blocking, Error, Genre,
    PasswordError, Result, ValidatedJson,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::middleware::AccountsState;
use crate::domain::entities::User;

// ============================================================
// DTOs
// ============================================================

/// Request to register a new account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,

    #[validate(length(min = 2, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6))]
    pub password: String,

    #[serde(default)]
    #[validate(nested)]
    pub favourite_genres: Vec<Genre>,
}

/// Request to log in with email and password
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Request to exchange a refresh token
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// User view without the password hash or stored tokens
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub favourite_genres: Vec<Genre>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            favourite_genres: user.favourite_genres,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User view plus a freshly issued token pair
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ============================================================
// Handlers
// ============================================================

/// POST /users: Register a new account
pub async fn register(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    if state.repos.users.email_exists(&request.email).await? {
        return Err(Error::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password_blocking(request.password)
        .await
        .map_err(|e| Error::Internal(format!("Unable to hash password: {}", e)))?;

    let user = User::new(
        request.first_name,
        request.last_name,
        &request.email,
        password_hash,
        request.favourite_genres,
    );
    state.repos.users.create(&user).await?;

    let tokens = state.auth.start_session(&user.identity()).await?;

    tracing::info!(user_id = %user.user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: UserResponse::from(user),
            tokens,
        }),
    ))
}

/// POST /users/login: Exchange credentials for a token pair
pub async fn login(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let Some(user) = state.repos.users.find_by_email(&request.email).await? else {
        reject_unknown_account(request.password).await;
        tracing::info!(reason = "unknown_email", "Rejected login");
        return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
    };

    match verify_password_blocking(request.password, user.password.clone()).await {
        Ok(()) => {}
        Err(PasswordError::InvalidHashFormat) => {
            tracing::warn!(user_id = %user.user_id, "Stored password hash is malformed");
            return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
        }
        Err(_) => {
            tracing::info!(user_id = %user.user_id, reason = "wrong_password", "Rejected login");
            return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
        }
    }

    let tokens = state.auth.start_session(&user.identity()).await?;

    Ok(Json(SessionResponse {
        user: UserResponse::from(user),
        tokens,
    }))
}

/// POST /users/refresh: Exchange a refresh token for a new pair.
///
/// The user record is reloaded so the new pair reflects the current role.
pub async fn refresh(
    State(state): State<AccountsState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> Result<Json<SessionResponse>> {
    let claims = state
        .auth
        .refresh_verifier()
        .verify(&request.refresh_token)
        .map_err(|reason| {
            tracing::info!(reason = %reason, "Rejected refresh token");
            Error::Authentication("Invalid or expired refresh token".to_string())
        })?;

    let user = state
        .repos
        .users
        .find_by_id(&claims.user_id)
        .await?
        .ok_or_else(|| {
            tracing::info!(user_id = %claims.user_id, "Refresh token for a removed user");
            Error::Authentication("Invalid or expired refresh token".to_string())
        })?;

    let tokens = state.auth.start_session(&user.identity()).await?;

    Ok(Json(SessionResponse {
        user: UserResponse::from(user),
        tokens,
    }))
}

/// GET /users: List all users
pub async fn list_users(
    identity: RequestIdentity,
    State(state): State<AccountsState>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = state.repos.users.list().await?;

    tracing::debug!(requested_by = %identity.user_id(), count = users.len(), "Listed users");

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
