//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use crate::domain::entity::{RefreshToken, User};
use crate::domain::value_object::{Email, UserId, Username};
use crate::error::AuthResult;

/// User repository trait
///
/// Owns identity records. `create` must fail when the username or email is
/// already registered; implementations are expected to enforce this with
/// storage-level uniqueness constraints, not just the callers' pre-checks,
/// so concurrent registrations cannot both succeed.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by username (exact match)
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>>;

    /// Check if username is already registered
    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool>;

    /// Check if email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;
}

/// Refresh token repository trait
///
/// Owns the one-per-identity refresh credential rows. Writes are single
/// independent upserts/deletes with last-writer-wins semantics: a refresh
/// and a logout racing on the same identity may both observe the same
/// stored token before either write lands, and the surviving state is
/// whichever write lands last. Revocation is best-effort in that narrow
/// window, not linearizable.
#[trait_variant::make(RefreshTokenRepository: Send)]
pub trait LocalRefreshTokenRepository {
    /// Store the current refresh token for an identity, replacing any
    /// previous one
    async fn upsert(&self, refresh: &RefreshToken) -> AuthResult<()>;

    /// Fetch the currently stored refresh token for an identity
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<RefreshToken>>;

    /// Delete the row holding exactly this token. Deleting a token that is
    /// not stored is not an error.
    async fn delete_by_token(&self, token: &str) -> AuthResult<()>;
}
