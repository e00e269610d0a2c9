//! Auth Middleware
//!
//! The request guard for protected routes. Both credential cookies must be
//! present before anything else happens; only the access token is verified
//! here. Refreshing is a distinct, explicit client action, never a fallback
//! performed by the guard.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use platform::cookie::extract_cookie;

use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::error::AuthError;
use crate::presentation::dto::UserResponse;
use crate::presentation::handlers::AuthAppState;

/// Identity projection attached to the request for downstream handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserResponse);

/// Middleware that requires a valid access credential
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + RefreshTokenRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers();

    // Both cookies must be present; reject before touching any store.
    let access = extract_cookie(headers, &state.config.access_cookie_name);
    let refresh = extract_cookie(headers, &state.config.refresh_cookie_name);

    let (Some(access), Some(_refresh)) = (access, refresh) else {
        return Err(AuthError::InvalidToken.into_response());
    };

    let user_id = state
        .tokens
        .verify_access(&access)
        .map_err(IntoResponse::into_response)?;

    let user = state
        .repo
        .find_by_id(&user_id)
        .await
        .map_err(IntoResponse::into_response)?
        .ok_or_else(|| AuthError::InvalidToken.into_response())?;

    req.extensions_mut()
        .insert(AuthenticatedUser(UserResponse::from(&user)));

    Ok(next.run(req).await)
}
