//! Application Configuration

use std::time::Duration;

use platform::cookie::CookieConfig;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
///
/// Access and refresh tokens are signed with independent secrets so that a
/// leaked access token can never be replayed as a refresh token. The
/// refresh TTL must exceed the access TTL, and the cookie Max-Age must not
/// be shorter than the refresh TTL.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret for signing access tokens (32 bytes)
    pub access_secret: [u8; 32],
    /// Secret for signing refresh tokens (32 bytes, independent)
    pub refresh_secret: [u8; 32],
    /// Access token TTL (30 minutes)
    pub access_ttl: Duration,
    /// Refresh token TTL (60 minutes)
    pub refresh_ttl: Duration,
    /// Access credential cookie name
    pub access_cookie_name: String,
    /// Refresh credential cookie name
    pub refresh_cookie_name: String,
    /// Outer cookie expiry (24 hours); the signed TTL inside the token is
    /// what actually bounds validity
    pub cookie_max_age: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: [0u8; 32],
            refresh_secret: [0u8; 32],
            access_ttl: Duration::from_secs(30 * 60),
            refresh_ttl: Duration::from_secs(60 * 60),
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_max_age: Duration::from_secs(24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl AuthConfig {
    /// Create config with random signing secrets (for development)
    pub fn with_random_secrets() -> Self {
        Self {
            access_secret: platform::crypto::random_secret(),
            refresh_secret: platform::crypto::random_secret(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Cookie attributes for the access credential
    pub fn access_cookie(&self) -> CookieConfig {
        self.cookie(&self.access_cookie_name)
    }

    /// Cookie attributes for the refresh credential
    pub fn refresh_cookie(&self) -> CookieConfig {
        self.cookie(&self.refresh_cookie_name)
    }

    fn cookie(&self, name: &str) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.cookie_max_age.as_secs() as i64),
            ..CookieConfig::new(name)
        }
    }
}
