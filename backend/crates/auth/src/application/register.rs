//! Register Use Case
//!
//! Creates a new identity and establishes its first session.

use std::sync::Arc;

use crate::application::token::{TokenPair, TokenService};
use crate::domain::entity::{RefreshToken, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{DisplayName, Email, Username};
use crate::error::{AuthError, AuthResult};
use platform::password::ClearTextPassword;

/// Register input (raw request values, validated here)
pub struct RegisterInput {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    pub tokens: TokenPair,
}

/// Register use case
pub struct RegisterUseCase<U, R>
where
    U: UserRepository,
    R: RefreshTokenRepository,
{
    user_repo: Arc<U>,
    refresh_repo: Arc<R>,
    token_service: Arc<TokenService>,
}

impl<U, R> RegisterUseCase<U, R>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Validate shape
        let username =
            Username::new(input.username).map_err(|e| AuthError::Validation(e.to_string()))?;
        let name =
            DisplayName::new(input.name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let email = Email::new(input.email).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        // Friendly pre-checks. The storage-level unique constraints are what
        // actually close the concurrent-registration race; `create` below
        // maps a unique violation to the same Conflict errors.
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }
        if self.user_repo.exists_by_username(&username).await? {
            return Err(AuthError::UsernameTaken);
        }

        // Hash password and persist the identity
        let password_hash = password.hash()?;
        let user = User::new(username, name, email, password_hash);
        self.user_repo.create(&user).await?;

        // Issue credentials and store the refresh token. A failure here
        // leaves the identity persisted but no session; the client retries
        // with login.
        let tokens = self.token_service.sign_pair(&user.user_id);
        self.refresh_repo
            .upsert(&RefreshToken::new(user.user_id, tokens.refresh.clone()))
            .await?;

        tracing::info!(
            user_id = %user.user_id,
            username = %user.username,
            "User registered"
        );

        Ok(RegisterOutput { user, tokens })
    }
}
