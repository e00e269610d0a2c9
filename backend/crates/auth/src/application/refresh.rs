//! Refresh Use Case
//!
//! Exchanges a valid refresh token for a brand-new access/refresh pair.
//! This is the rotation point: the stored credential is overwritten, so the
//! token that was just presented stops matching and can never be used
//! again, even though its signature and expiry remain individually valid.

use std::sync::Arc;

use crate::application::token::{TokenPair, TokenService};
use crate::domain::entity::{RefreshToken, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Refresh output
#[derive(Debug)]
pub struct RefreshOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Refresh use case
pub struct RefreshUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<R>,
    token_service: Arc<TokenService>,
}

impl<U, R> RefreshUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    pub fn new(user_repo: Arc<U>, refresh_repo: Arc<R>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_repo,
            refresh_repo,
            token_service,
        }
    }

    pub async fn execute(&self, presented: &str) -> AuthResult<RefreshOutput> {
        // Signature and expiry first; a forged or stale token never reaches
        // the store.
        let user_id = self.token_service.verify_refresh(presented)?;

        // Replay guard: the presented token must equal the stored one
        // exactly. A rotated-away token fails here.
        let stored = self
            .refresh_repo
            .find_by_user_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !stored.matches(presented) {
            tracing::warn!(user_id = %user_id, "Superseded refresh token presented");
            return Err(AuthError::InvalidToken);
        }

        // An identity missing for a structurally valid token is coerced to
        // the same 401; existence is not leaked.
        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        // Rotate
        let tokens = self.token_service.sign_pair(&user_id);
        self.refresh_repo
            .upsert(&RefreshToken::new(user_id, tokens.refresh.clone()))
            .await?;

        tracing::info!(user_id = %user_id, "Refresh credential rotated");

        Ok(RefreshOutput { user, tokens })
    }
}
