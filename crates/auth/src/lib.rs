//! # Corebank Auth
//!
//! Credential handling for the back office: salted SHA-256 password hashes
//! and opaque expiring access tokens. Stored format is `salt$digest` with
//! both halves hex-encoded, so a hash is self-describing and re-hashing on
//! verify needs no extra state.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Token lifetime in minutes
pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

const SALT_LEN: usize = 16;
const TOKEN_LEN: usize = 32;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Inactive holder account")]
    HolderInactive,

    #[error("Malformed password hash")]
    MalformedHash,
}

/// Result type alias for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// Verify a plaintext password against a stored `salt$digest` hash.
pub fn verify_password(password: &str, stored: &str) -> AuthResult<bool> {
    let (salt_hex, digest_hex) = stored.split_once('$').ok_or(AuthError::MalformedHash)?;
    let salt = hex::decode(salt_hex).map_err(|_| AuthError::MalformedHash)?;
    let expected = hex::decode(digest_hex).map_err(|_| AuthError::MalformedHash)?;

    let actual = salted_digest(&salt, password);
    Ok(constant_time_eq(&actual, &expected))
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

// Comparison must not short-circuit on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// An issued access token. Opaque to the holder; the collaborator layer is
/// expected to keep it server-side and check `expires_at` on use.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub holder_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Issue a fresh random token for a holder.
    pub fn issue(holder_id: i64) -> Self {
        let mut bytes = [0u8; TOKEN_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        let issued_at = Utc::now();
        Self {
            token: hex::encode(bytes),
            holder_id,
            issued_at,
            expires_at: issued_at + Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret");
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a).unwrap());
        assert!(verify_password("same", &b).unwrap());
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(matches!(
            verify_password("x", "not-a-hash"),
            Err(AuthError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("x", "zz$zz"),
            Err(AuthError::MalformedHash)
        ));
    }

    #[test]
    fn test_token_expiry() {
        let token = AccessToken::issue(1);
        assert_eq!(token.token.len(), TOKEN_LEN * 2);
        assert!(!token.is_expired(token.issued_at));
        assert!(token.is_expired(token.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(AccessToken::issue(1).token, AccessToken::issue(1).token);
    }
}
