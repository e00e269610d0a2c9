//! Login Use Case
//!
//! Authenticates an identity and issues a fresh credential pair. Logging in
//! overwrites any previously stored refresh credential, so at most one
//! refresh session exists per identity.

use std::sync::Arc;

use crate::application::token::{TokenPair, TokenService};
use crate::domain::entity::{RefreshToken, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::Username;
use crate::error::{AuthError, AuthResult};
use platform::password::ClearTextPassword;

/// Login input
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Login use case
pub struct LoginUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<R>,
    token_service: Arc<TokenService>,
}

impl<U, R> LoginUseCase<U, R>
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

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // A username or password that cannot even be well-formed is treated
        // the same as a wrong one; login never reports which part failed.
        let username =
            Username::new(input.username).map_err(|_| AuthError::InvalidCredentials)?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_valid = user.verify_password(&password)?;
        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.token_service.sign_pair(&user.user_id);
        self.refresh_repo
            .upsert(&RefreshToken::new(user.user_id, tokens.refresh.clone()))
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            username = %user.username,
            "User logged in"
        );

        Ok(LoginOutput { user, tokens })
    }
}
