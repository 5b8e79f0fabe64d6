//! Authentication failures and per-operation authorization rules.
//!
//! The rules are pure functions over a verified [`IdentityClaim`]; handlers
//! evaluate them before touching storage so a rejected request has no side
//! effects.

use thiserror::Error;

use crate::domain::entities::{IdentityClaim, UserId};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Authorization header absent or not using the `Bearer` scheme
    #[error("Missing or malformed bearer credential")]
    NoCredential,

    /// Encoding, signature or claim shape is invalid
    #[error("Invalid token")]
    MalformedToken,

    #[error("Token has expired")]
    TokenExpired,

    /// A handler asked for an identity on a route mounted without the auth middleware
    #[error("CRITICAL: no identity attached to request; auth middleware is not wired")]
    MissingIdentity,

    #[error("Insufficient privilege")]
    Forbidden,
}

impl AuthError {
    /// Wiring defects, as opposed to failures caused by the caller
    pub fn is_wiring_defect(&self) -> bool {
        matches!(self, AuthError::MissingIdentity)
    }
}

/// Ownership and privilege checks consumed by handlers
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    /// True iff the caller owns the resource or is an admin
    pub fn is_self_or_admin(claim: &IdentityClaim, resource_owner: UserId) -> bool {
        claim.is_admin || claim.subject_id == resource_owner
    }

    pub fn require_self_or_admin(
        claim: &IdentityClaim,
        resource_owner: UserId,
    ) -> Result<(), AuthError> {
        if Self::is_self_or_admin(claim, resource_owner) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    pub fn require_admin(claim: &IdentityClaim) -> Result<(), AuthError> {
        if claim.is_admin { Ok(()) } else { Err(AuthError::Forbidden) }
    }
}
