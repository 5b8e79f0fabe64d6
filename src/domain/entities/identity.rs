use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::UserId;

/// Who a token is issued for, before an expiry is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: UserId,
    pub is_admin: bool,
}

impl Identity {
    #[must_use]
    pub fn user(subject_id: UserId) -> Self {
        Self { subject_id, is_admin: false }
    }

    #[must_use]
    pub fn admin(subject_id: UserId) -> Self {
        Self { subject_id, is_admin: true }
    }
}

/// Verified identity attached to an authenticated request
///
/// `is_admin` reflects the user's privilege at issuance time and is not
/// re-checked against storage while the token is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub subject_id: UserId,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl IdentityClaim {
    /// A claim is valid strictly before `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn identity(&self) -> Identity {
        Identity { subject_id: self.subject_id, is_admin: self.is_admin }
    }
}

impl fmt::Display for IdentityClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IdentityClaim(subject_id={}, is_admin={}, expires_at={})",
            self.subject_id,
            self.is_admin,
            self.expires_at.to_rfc3339()
        )
    }
}
