//! Role-based authorization gate

use crate::claims::Role;
use crate::context::RequestIdentity;
use crate::error::AuthError;

/// Exact-match role check applied after authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    required: Role,
}

impl RoleGate {
    pub fn require(required: Role) -> Self {
        Self { required }
    }

    pub fn check(&self, identity: &RequestIdentity) -> Result<(), AuthError> {
        if identity.role() == self.required {
            return Ok(());
        }

        tracing::info!(
            user_id = %identity.user_id(),
            role = %identity.role(),
            required = %self.required,
            "Role check failed"
        );
        Err(AuthError::Forbidden {
            required: self.required,
        })
    }
}

/// Type-level role used by `RequireRole<R>`
pub trait RoleRequirement: Send + Sync + 'static {
    const ROLE: Role;
}

#[derive(Debug, Clone, Copy)]
pub struct AdminRole;

impl RoleRequirement for AdminRole {
    const ROLE: Role = Role::Admin;
}
