//! Auth (Identity & Session) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token service, configuration
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - User registration and login with username + password
//! - Short-lived access tokens and rotated refresh tokens, both signed
//!   with HMAC-SHA256 under independent secrets
//! - At most one active refresh credential per identity; every refresh
//!   replaces the stored token and the superseded one stops matching
//! - Cookie-based credential transport (HttpOnly, site-wide)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, plaintext zeroized after use
//! - Login failures do not reveal whether the username exists
//! - Refresh replay is rejected by exact-match comparison against the
//!   stored credential

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::TokenService;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
