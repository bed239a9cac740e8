//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::claims::Role;

/// Why a presented token was not accepted.
///
/// Kept distinct for logging; every kind becomes the same 401 at the HTTP
/// boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    #[error("no token presented")]
    MissingToken,

    #[error("token is not a well-formed JWT")]
    MalformedToken,

    #[error("token signature does not verify")]
    SignatureInvalid,

    #[error("token declares an algorithm other than HS256")]
    AlgorithmMismatch,

    #[error("token has expired")]
    Expired,

    #[error("token claims are invalid")]
    InvalidClaims,
}

/// Token minting failure
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),
}

impl From<TokenError> for marquee_common::Error {
    fn from(error: TokenError) -> Self {
        marquee_common::Error::Internal(error.to_string())
    }
}

/// Request-boundary authentication error
#[derive(Debug)]
pub enum AuthError {
    Unauthenticated(VerificationError),
    /// Valid identity without the role the operation requires
    Forbidden { required: Role },
    /// Identity read from a request that never passed token verification
    IdentityMissing,
}

impl From<VerificationError> for AuthError {
    fn from(error: VerificationError) -> Self {
        AuthError::Unauthenticated(error)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::Unauthenticated(VerificationError::MissingToken) => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required".to_string(),
            ),
            AuthError::Unauthenticated(reason) => {
                tracing::debug!(reason = %reason, "Rejected request token");
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_TOKEN",
                    "Invalid or expired token".to_string(),
                )
            }
            AuthError::Forbidden { required } => (
                StatusCode::FORBIDDEN,
                "INSUFFICIENT_ROLE",
                format!("This operation requires the {} role", required),
            ),
            AuthError::IdentityMissing => {
                tracing::warn!("Identity requested on a route without token verification");
                (
                    StatusCode::BAD_REQUEST,
                    "IDENTITY_MISSING",
                    "Request identity is not available".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
