//! Authentication core for Marquee API
//!
//! Issues access/refresh token pairs, verifies presented tokens, and
//! provides axum extractors and a route layer that work with any domain
//! state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod gate;
mod issuer;
pub mod jwt;
mod session;
mod verifier;

pub use backend::AuthBackend;
pub use claims::{Claims, Identity, Role, TokenPair};
pub use config::{AuthConfig, SigningSecret};
pub use context::RequestIdentity;
pub use error::{AuthError, TokenError, VerificationError};
pub use extractors::{authenticate, AdminUser, AuthUser, RequireRole};
pub use gate::{AdminRole, RoleGate, RoleRequirement};
pub use issuer::TokenIssuer;
pub use session::SessionRecorder;
pub use verifier::{TokenKind, TokenVerifier};
