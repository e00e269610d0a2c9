//! User Entity
//!
//! A registered identity. Created by registration and immutable afterwards
//! as far as this subsystem is concerned; it is never deleted here.

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError};

use crate::domain::value_object::{DisplayName, Email, UserId, Username};

/// User entity
///
/// `username` and `email` are each unique across all users (enforced by the
/// store). `password_hash` never holds plaintext.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier, stable for the lifetime of the identity
    pub user_id: UserId,
    /// Unique login name
    pub username: Username,
    /// Display name
    pub name: DisplayName,
    /// Unique email address
    pub email: Email,
    /// Argon2id hash in PHC format
    pub password_hash: HashedPassword,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID and creation time
    pub fn new(
        username: Username,
        name: DisplayName,
        email: Email,
        password_hash: HashedPassword,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            username,
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Verify a plaintext candidate against the stored hash
    pub fn verify_password(
        &self,
        candidate: &ClearTextPassword,
    ) -> Result<bool, PasswordHashError> {
        self.password_hash.verify(candidate)
    }
}
