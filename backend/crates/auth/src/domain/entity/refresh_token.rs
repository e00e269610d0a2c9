//! Refresh Token Entity
//!
//! The single currently-valid long-lived credential for an identity. The
//! token's own expiry is signed inside the token string; this row only
//! records which token is current.

use chrono::{DateTime, Utc};

use crate::domain::value_object::UserId;

/// Refresh credential row, at most one per identity
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Owning identity
    pub user_id: UserId,
    /// Opaque signed token string
    pub token: String,
    /// When this token was stored (bookkeeping only)
    pub issued_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(user_id: UserId, token: String) -> Self {
        Self {
            user_id,
            token,
            issued_at: Utc::now(),
        }
    }

    /// Exact-match replay guard: a presented token is only acceptable if it
    /// equals the stored one byte for byte. A rotated-away token fails here
    /// even while its signature and expiry are still individually valid.
    pub fn matches(&self, presented: &str) -> bool {
        platform::crypto::constant_time_eq(self.token.as_bytes(), presented.as_bytes())
    }
}
