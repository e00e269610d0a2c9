//! Logout Use Case
//!
//! Revokes the stored refresh credential. Best-effort: deleting a token
//! that is not stored (already rotated away, or a repeated logout) is not
//! an error.

use std::sync::Arc;

use crate::domain::repository::RefreshTokenRepository;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    refresh_repo: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: RefreshTokenRepository,
{
    pub fn new(refresh_repo: Arc<R>) -> Self {
        Self { refresh_repo }
    }

    pub async fn execute(&self, presented: &str) -> AuthResult<()> {
        self.refresh_repo.delete_by_token(presented).await?;

        tracing::info!("Session revoked");
        Ok(())
    }
}
