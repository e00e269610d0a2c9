//! Token Service
//!
//! Stateless signer/verifier for the two token classes. A token is
//! `base64url(claims JSON) . base64url(HMAC-SHA256 signature)`, signed with
//! the class-specific secret. Verification recomputes the signature, then
//! checks the embedded expiry; it performs no I/O and has no side effects.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Signed token payload
///
/// `jti` is a random nonce making every issued token distinct even when two
/// are signed within the same millisecond; the refresh rotation replay
/// guard depends on issued tokens never colliding.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Identity ID
    pub sub: Uuid,
    /// Random per-token nonce
    pub jti: Uuid,
    /// Issued-at, milliseconds since epoch
    pub iat: i64,
    /// Expiry, milliseconds since epoch
    pub exp: i64,
}

/// A freshly signed access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Stateless signer/verifier for access and refresh tokens
#[derive(Clone)]
pub struct TokenService {
    access_secret: [u8; 32],
    refresh_secret: [u8; 32],
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_secret,
            refresh_secret: config.refresh_secret,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Sign a short-lived access token for an identity
    pub fn sign_access(&self, user_id: &UserId) -> String {
        Self::sign(&self.access_secret, user_id, self.access_ttl)
    }

    /// Sign a long-lived refresh token for an identity
    pub fn sign_refresh(&self, user_id: &UserId) -> String {
        Self::sign(&self.refresh_secret, user_id, self.refresh_ttl)
    }

    /// Sign a fresh access/refresh pair
    pub fn sign_pair(&self, user_id: &UserId) -> TokenPair {
        TokenPair {
            access: self.sign_access(user_id),
            refresh: self.sign_refresh(user_id),
        }
    }

    /// Verify an access token and extract the identity ID
    pub fn verify_access(&self, token: &str) -> AuthResult<UserId> {
        Self::verify(&self.access_secret, token)
    }

    /// Verify a refresh token and extract the identity ID
    pub fn verify_refresh(&self, token: &str) -> AuthResult<UserId> {
        Self::verify(&self.refresh_secret, token)
    }

    fn sign(secret: &[u8; 32], user_id: &UserId, ttl: Duration) -> String {
        let now = Utc::now().timestamp_millis();
        let claims = Claims {
            sub: *user_id.as_uuid(),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + ttl.as_millis() as i64,
        };

        let payload = platform::crypto::b64url_encode(
            &serde_json::to_vec(&claims).expect("claims are serializable"),
        );

        let mut mac =
            HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        format!("{}.{}", payload, platform::crypto::b64url_encode(&signature))
    }

    fn verify(secret: &[u8; 32], token: &str) -> AuthResult<UserId> {
        let (payload, signature_b64) =
            token.split_once('.').ok_or(AuthError::InvalidToken)?;

        let signature = platform::crypto::b64url_decode(signature_b64)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac =
            HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        // The signature is valid, so the payload is ours; it still has to
        // decode and be unexpired.
        let payload_bytes = platform::crypto::b64url_decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: Claims =
            serde_json::from_slice(&payload_bytes).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= Utc::now().timestamp_millis() {
            return Err(AuthError::InvalidToken);
        }

        Ok(UserId::from_uuid(claims.sub))
    }
}
