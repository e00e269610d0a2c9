//! Unit and scenario tests for the auth crate
//!
//! Pure units (token service, error mapping) plus the full session
//! lifecycle driven through the use cases against an in-memory repository,
//! and a few router-level checks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::application::token::TokenService;
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::entity::{RefreshToken, User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{Email, UserId, Username};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// In-memory repository
// ============================================================================

/// In-memory stand-in for the Postgres repository. Mirrors the storage
/// semantics the use cases rely on: unique username/email on insert, and
/// one refresh row per identity keyed by user id.
#[derive(Clone, Default)]
struct MemoryRepo {
    users: Arc<Mutex<Vec<User>>>,
    refresh: Arc<Mutex<HashMap<Uuid, RefreshToken>>>,
}

impl MemoryRepo {
    fn stored_refresh_token(&self, user_id: &UserId) -> Option<String> {
        self.refresh
            .lock()
            .unwrap()
            .get(user_id.as_uuid())
            .map(|r| r.token.clone())
    }
}

impl UserRepository for MemoryRepo {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameTaken);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.user_id == *user_id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == *username).cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.username == *username))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.email == *email))
    }
}

impl RefreshTokenRepository for MemoryRepo {
    async fn upsert(&self, refresh: &RefreshToken) -> AuthResult<()> {
        self.refresh
            .lock()
            .unwrap()
            .insert(*refresh.user_id.as_uuid(), refresh.clone());
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<RefreshToken>> {
        Ok(self.refresh.lock().unwrap().get(user_id.as_uuid()).cloned())
    }

    async fn delete_by_token(&self, token: &str) -> AuthResult<()> {
        self.refresh
            .lock()
            .unwrap()
            .retain(|_, r| r.token != token);
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    repo: Arc<MemoryRepo>,
    tokens: Arc<TokenService>,
}

impl Fixture {
    fn new() -> Self {
        let config = AuthConfig::with_random_secrets();
        Self {
            repo: Arc::new(MemoryRepo::default()),
            tokens: Arc::new(TokenService::new(&config)),
        }
    }

    fn register(&self) -> RegisterUseCase<MemoryRepo, MemoryRepo> {
        RegisterUseCase::new(self.repo.clone(), self.repo.clone(), self.tokens.clone())
    }

    fn login(&self) -> LoginUseCase<MemoryRepo, MemoryRepo> {
        LoginUseCase::new(self.repo.clone(), self.repo.clone(), self.tokens.clone())
    }

    fn refresh(&self) -> RefreshUseCase<MemoryRepo, MemoryRepo> {
        RefreshUseCase::new(self.repo.clone(), self.repo.clone(), self.tokens.clone())
    }

    fn logout(&self) -> LogoutUseCase<MemoryRepo> {
        LogoutUseCase::new(self.repo.clone())
    }
}

fn alice_input() -> RegisterInput {
    RegisterInput {
        username: "alice".to_string(),
        name: "Alice".to_string(),
        email: "a@x.com".to_string(),
        password: "Aa1!aa".to_string(),
    }
}

// ============================================================================
// Token service
// ============================================================================

#[cfg(test)]
mod token_tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_access_round_trip() {
        let service = TokenService::new(&AuthConfig::with_random_secrets());
        let user_id = UserId::new();

        let token = service.sign_access(&user_id);
        assert_eq!(service.verify_access(&token).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_round_trip() {
        let service = TokenService::new(&AuthConfig::with_random_secrets());
        let user_id = UserId::new();

        let token = service.sign_refresh(&user_id);
        assert_eq!(service.verify_refresh(&token).unwrap(), user_id);
    }

    #[test]
    fn test_classes_are_not_interchangeable() {
        let service = TokenService::new(&AuthConfig::with_random_secrets());
        let user_id = UserId::new();

        let access = service.sign_access(&user_id);
        let refresh = service.sign_refresh(&user_id);

        assert!(matches!(
            service.verify_refresh(&access),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            service.verify_access(&refresh),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = AuthConfig {
            access_ttl: Duration::ZERO,
            ..AuthConfig::with_random_secrets()
        };
        let service = TokenService::new(&config);

        let token = service.sign_access(&UserId::new());
        assert!(matches!(
            service.verify_access(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = TokenService::new(&AuthConfig::with_random_secrets());
        let token = service.sign_access(&UserId::new());

        let (payload, signature) = token.split_once('.').unwrap();
        let mut bytes = platform::crypto::b64url_decode(payload).unwrap();
        bytes[10] ^= 0x01;
        let forged = format!("{}.{}", platform::crypto::b64url_encode(&bytes), signature);

        assert!(matches!(
            service.verify_access(&forged),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let service = TokenService::new(&AuthConfig::with_random_secrets());

        for token in ["", "no-dot", "a.b", "a.b.c", "!!!.???"] {
            assert!(
                matches!(service.verify_access(token), Err(AuthError::InvalidToken)),
                "{token}"
            );
        }
    }

    #[test]
    fn test_tokens_signed_at_the_same_instant_differ() {
        // The jti nonce keeps rotation meaningful even when two tokens are
        // minted within one millisecond.
        let service = TokenService::new(&AuthConfig::with_random_secrets());
        let user_id = UserId::new();

        assert_ne!(service.sign_refresh(&user_id), service.sign_refresh(&user_id));
    }

    #[test]
    fn test_different_secrets_reject_each_other() {
        let a = TokenService::new(&AuthConfig::with_random_secrets());
        let b = TokenService::new(&AuthConfig::with_random_secrets());

        let token = a.sign_access(&UserId::new());
        assert!(matches!(b.verify_access(&token), Err(AuthError::InvalidToken)));
    }
}

// ============================================================================
// Error taxonomy
// ============================================================================

#[cfg(test)]
mod error_tests {
    use super::*;
    use axum::http::StatusCode;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::UsernameTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_never_reaches_the_client() {
        let err = AuthError::Internal("connection string leaked".into());
        assert_eq!(err.to_app_error().message(), "internal server error");

        let err = AuthError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.to_app_error().message(), "internal server error");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::UsernameTaken.kind(), ErrorKind::Conflict);
        assert_eq!(AuthError::InvalidToken.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            AuthError::Validation("x".into()).kind(),
            ErrorKind::BadRequest
        );
    }
}

// ============================================================================
// Session lifecycle scenarios
// ============================================================================

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_succeeds_once() {
        let fx = Fixture::new();

        let output = fx.register().execute(alice_input()).await.unwrap();
        assert_eq!(output.user.username.as_str(), "alice");
        assert!(!output.tokens.access.is_empty());
        assert!(!output.tokens.refresh.is_empty());

        // The refresh credential is stored for the new identity
        assert_eq!(
            fx.repo.stored_refresh_token(&output.user.user_id).as_deref(),
            Some(output.tokens.refresh.as_str())
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let fx = Fixture::new();
        fx.register().execute(alice_input()).await.unwrap();

        let dup = RegisterInput {
            email: "other@x.com".to_string(),
            ..alice_input()
        };
        assert!(matches!(
            fx.register().execute(dup).await,
            Err(AuthError::UsernameTaken)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let fx = Fixture::new();
        fx.register().execute(alice_input()).await.unwrap();

        let dup = RegisterInput {
            username: "alice2".to_string(),
            ..alice_input()
        };
        assert!(matches!(
            fx.register().execute(dup).await,
            Err(AuthError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_input() {
        let fx = Fixture::new();

        let bad_email = RegisterInput {
            email: "not-an-email".to_string(),
            ..alice_input()
        };
        assert!(matches!(
            fx.register().execute(bad_email).await,
            Err(AuthError::Validation(_))
        ));

        let weak_password = RegisterInput {
            password: "password".to_string(),
            ..alice_input()
        };
        assert!(matches!(
            fx.register().execute(weak_password).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let fx = Fixture::new();
        fx.register().execute(alice_input()).await.unwrap();

        // Wrong password for a known user
        let wrong_password = fx
            .login()
            .execute(LoginInput {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        // Unknown username entirely
        let unknown_user = fx
            .login()
            .execute(LoginInput {
                username: "nobody-here".to_string(),
                password: "Aa1!aa".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_issues_fresh_credentials() {
        let fx = Fixture::new();
        let registered = fx.register().execute(alice_input()).await.unwrap();

        let login = fx
            .login()
            .execute(LoginInput {
                username: "alice".to_string(),
                password: "Aa1!aa".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(login.user.user_id, registered.user.user_id);
        assert_ne!(login.tokens.refresh, registered.tokens.refresh);

        // Logging in again replaced the stored refresh credential
        assert_eq!(
            fx.repo.stored_refresh_token(&login.user.user_id).as_deref(),
            Some(login.tokens.refresh.as_str())
        );
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_blocks_replay() {
        let fx = Fixture::new();
        let registered = fx.register().execute(alice_input()).await.unwrap();
        let first_refresh_token = registered.tokens.refresh.clone();

        // First refresh succeeds and rotates
        let rotated = fx.refresh().execute(&first_refresh_token).await.unwrap();
        assert_eq!(rotated.user.user_id, registered.user.user_id);
        assert_ne!(rotated.tokens.refresh, first_refresh_token);

        // Replaying the superseded token fails, even though its signature
        // and expiry are still valid on their own
        assert!(matches!(
            fx.refresh().execute(&first_refresh_token).await,
            Err(AuthError::InvalidToken)
        ));

        // The rotated-to token still works
        assert!(fx.refresh().execute(&rotated.tokens.refresh).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rejects_forgeries() {
        let fx = Fixture::new();
        fx.register().execute(alice_input()).await.unwrap();

        // A token signed by someone else's service
        let foreign = TokenService::new(&AuthConfig::with_random_secrets());
        let forged = foreign.sign_refresh(&UserId::new());

        assert!(matches!(
            fx.refresh().execute(&forged).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_rejects_token_for_unknown_identity() {
        let fx = Fixture::new();

        // Structurally valid token, but no such user and nothing stored
        let token = fx.tokens.sign_refresh(&UserId::new());
        assert!(matches!(
            fx.refresh().execute(&token).await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let fx = Fixture::new();
        let registered = fx.register().execute(alice_input()).await.unwrap();
        let token = registered.tokens.refresh.clone();

        fx.logout().execute(&token).await.unwrap();
        // Second logout with the now-deleted token is not an error
        fx.logout().execute(&token).await.unwrap();

        // The session is gone: the token no longer refreshes
        assert!(matches!(
            fx.refresh().execute(&token).await,
            Err(AuthError::InvalidToken)
        ));
    }
}

// ============================================================================
// Router-level checks
// ============================================================================

#[cfg(test)]
mod router_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::domain::entity::{RefreshToken, User};
    use crate::presentation::router::auth_router_generic;

    /// Repository that fails the test if any store call happens
    #[derive(Clone)]
    struct PanicRepo;

    impl UserRepository for PanicRepo {
        async fn create(&self, _user: &User) -> AuthResult<()> {
            unreachable!("store must not be touched")
        }
        async fn find_by_id(&self, _user_id: &UserId) -> AuthResult<Option<User>> {
            unreachable!("store must not be touched")
        }
        async fn find_by_username(&self, _username: &Username) -> AuthResult<Option<User>> {
            unreachable!("store must not be touched")
        }
        async fn exists_by_username(&self, _username: &Username) -> AuthResult<bool> {
            unreachable!("store must not be touched")
        }
        async fn exists_by_email(&self, _email: &Email) -> AuthResult<bool> {
            unreachable!("store must not be touched")
        }
    }

    impl RefreshTokenRepository for PanicRepo {
        async fn upsert(&self, _refresh: &RefreshToken) -> AuthResult<()> {
            unreachable!("store must not be touched")
        }
        async fn find_by_user_id(&self, _user_id: &UserId) -> AuthResult<Option<RefreshToken>> {
            unreachable!("store must not be touched")
        }
        async fn delete_by_token(&self, _token: &str) -> AuthResult<()> {
            unreachable!("store must not be touched")
        }
    }

    /// Delegates to `MemoryRepo` except the refresh delete, which fails
    #[derive(Clone, Default)]
    struct FailingDeleteRepo(MemoryRepo);

    impl UserRepository for FailingDeleteRepo {
        async fn create(&self, user: &User) -> AuthResult<()> {
            self.0.create(user).await
        }
        async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
            self.0.find_by_id(user_id).await
        }
        async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
            self.0.find_by_username(username).await
        }
        async fn exists_by_username(&self, username: &Username) -> AuthResult<bool> {
            self.0.exists_by_username(username).await
        }
        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            self.0.exists_by_email(email).await
        }
    }

    impl RefreshTokenRepository for FailingDeleteRepo {
        async fn upsert(&self, refresh: &RefreshToken) -> AuthResult<()> {
            self.0.upsert(refresh).await
        }
        async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<RefreshToken>> {
            self.0.find_by_user_id(user_id).await
        }
        async fn delete_by_token(&self, _token: &str) -> AuthResult<()> {
            Err(AuthError::Internal("refresh store unavailable".to_string()))
        }
    }

    /// Register alice through the router and return her session cookies as
    /// a single Cookie header value.
    async fn register_and_collect_cookies(app: axum::Router) -> String {
        let body = serde_json::json!({
            "username": "alice",
            "name": "Alice",
            "email": "a@x.com",
            "password": "Aa1!aa",
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| {
                let set_cookie = v.to_str().unwrap();
                set_cookie.split(';').next().unwrap().to_string()
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    #[tokio::test]
    async fn test_protected_route_rejected_before_any_store_access() {
        // No credentials at all: the guard must answer 401 without ever
        // reaching the repository.
        let app = auth_router_generic(PanicRepo, AuthConfig::development());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_sets_both_credential_cookies() {
        let app = auth_router_generic(MemoryRepo::default(), AuthConfig::development());

        let body = serde_json::json!({
            "username": "alice",
            "name": "Alice",
            "email": "a@x.com",
            "password": "Aa1!aa",
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let cookies: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();

        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().any(|c| c.starts_with("accessToken=")));
        assert!(cookies.iter().any(|c| c.starts_with("refreshToken=")));
        assert!(cookies.iter().all(|c| c.contains("HttpOnly")));
    }

    #[tokio::test]
    async fn test_guard_admits_valid_credentials() {
        // Valid cookies get through the guard: the access token verifies,
        // the identity resolves, and logout answers 200 with both
        // credentials cleared.
        let app = auth_router_generic(MemoryRepo::default(), AuthConfig::development());
        let cookies = register_and_collect_cookies(app.clone()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, cookies)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let cleared: Vec<_> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cleared.len(), 2);
        assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_logout_surfaces_store_failure() {
        // A failing refresh-row delete is a server error, not a silent 200.
        let app = auth_router_generic(FailingDeleteRepo::default(), AuthConfig::development());
        let cookies = register_and_collect_cookies(app.clone()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .header(header::COOKIE, cookies)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_refresh_without_cookie_is_unauthorized() {
        let app = auth_router_generic(MemoryRepo::default(), AuthConfig::development());

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
