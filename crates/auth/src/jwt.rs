//! Token codec and credential-channel helpers
//!
//! Compact JWS with HS256 only. The header algorithm is inspected before
//! any key material is used, so tokens declaring `none`, HS384/HS512 or an
//! asymmetric algorithm are rejected outright.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode as encode_jwt, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::Deserialize;

use crate::claims::Claims;
use crate::config::SigningSecret;
use crate::error::{TokenError, VerificationError};

const EXPECTED_ALGORITHM: &str = "HS256";

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Sign claims into a compact token
pub fn encode(claims: &Claims, secret: &SigningSecret) -> Result<String, TokenError> {
    encode_jwt(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Decode a token and verify signature, algorithm, expiry and claims at `now`.
///
/// A token is expired once `now >= exp`.
pub fn decode_and_verify(
    token: &str,
    secret: &SigningSecret,
    issuer: &str,
    now: DateTime<Utc>,
) -> Result<Claims, VerificationError> {
    check_algorithm(token)?;

    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry and issuer are checked below against the caller's instant
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => VerificationError::SignatureInvalid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            VerificationError::AlgorithmMismatch
        }
        _ => VerificationError::MalformedToken,
    })?;

    if now.timestamp() >= claims.exp {
        return Err(VerificationError::Expired);
    }
    if claims.iss != issuer || claims.exp <= claims.iat {
        return Err(VerificationError::InvalidClaims);
    }

    Ok(claims)
}

fn check_algorithm(token: &str) -> Result<(), VerificationError> {
    let mut parts = token.split('.');
    let (Some(header), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(VerificationError::MalformedToken);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| VerificationError::MalformedToken)?;
    let header: RawHeader =
        serde_json::from_slice(&bytes).map_err(|_| VerificationError::MalformedToken)?;

    if header.alg == EXPECTED_ALGORITHM {
        Ok(())
    } else {
        Err(VerificationError::AlgorithmMismatch)
    }
}

/// Read the token from the `Authorization` header.
///
/// Accepts `Bearer <token>` (scheme name in any case) and a bare token. An absent header, an empty
/// value, or `Bearer` with nothing after it means no token was presented.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, VerificationError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(VerificationError::MissingToken)?
        .to_str()
        .map_err(|_| VerificationError::MalformedToken)?
        .trim();

    let token = match strip_scheme(value) {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => value,
    };

    if token.is_empty() {
        Err(VerificationError::MissingToken)
    } else {
        Ok(token)
    }
}

/// Remove a leading `Bearer` scheme name, matched case-insensitively
fn strip_scheme(value: &str) -> Option<&str> {
    const SCHEME: &str = "Bearer";
    let head = value.get(..SCHEME.len())?;
    head.eq_ignore_ascii_case(SCHEME)
        .then(|| &value[SCHEME.len()..])
}
