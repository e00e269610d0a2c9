//! HTTP Handlers
//!
//! One handler per session operation. Credentials travel as two HttpOnly
//! cookies; every response that issues credentials sets both, and logout
//! clears both.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::sync::Arc;

use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::token::{TokenPair, TokenService};
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginRequest, RegisterRequest, SessionResponse, UserResponse};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        RegisterUseCase::new(state.repo.clone(), state.repo.clone(), state.tokens.clone());

    let input = RegisterInput {
        username: req.username,
        name: req.name,
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        set_credential_cookies(&state.config, &output.tokens),
        Json(SessionResponse::authenticated(UserResponse::from(
            &output.user,
        ))),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.tokens.clone());

    let input = LoginInput {
        username: req.username,
        password: req.password,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::OK,
        set_credential_cookies(&state.config, &output.tokens),
        Json(SessionResponse::authenticated(UserResponse::from(
            &output.user,
        ))),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /logout (behind the auth guard)
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.refresh_cookie_name);

    if let Some(token) = token {
        // Revocation is best-effort only in that an absent token is fine
        // (delete is idempotent); a store failure still surfaces as 500.
        let use_case = LogoutUseCase::new(state.repo.clone());
        use_case.execute(&token).await?;
    }

    Ok((
        StatusCode::OK,
        clear_credential_cookies(&state.config),
        Json(SessionResponse::anonymous()),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// GET /refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let presented = extract_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or(AuthError::InvalidToken)?;

    let use_case =
        RefreshUseCase::new(state.repo.clone(), state.repo.clone(), state.tokens.clone());

    let output = use_case.execute(&presented).await?;

    Ok((
        StatusCode::OK,
        set_credential_cookies(&state.config, &output.tokens),
        Json(SessionResponse::authenticated(UserResponse::from(
            &output.user,
        ))),
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

type CookieHeaders = AppendHeaders<[(header::HeaderName, header::HeaderValue); 2]>;

fn set_credential_cookies(config: &AuthConfig, tokens: &TokenPair) -> CookieHeaders {
    AppendHeaders([
        (
            header::SET_COOKIE,
            config.access_cookie().set_cookie_header(&tokens.access),
        ),
        (
            header::SET_COOKIE,
            config.refresh_cookie().set_cookie_header(&tokens.refresh),
        ),
    ])
}

fn clear_credential_cookies(config: &AuthConfig) -> CookieHeaders {
    AppendHeaders([
        (header::SET_COOKIE, config.access_cookie().clear_cookie_header()),
        (header::SET_COOKIE, config.refresh_cookie().clear_cookie_header()),
    ])
}
