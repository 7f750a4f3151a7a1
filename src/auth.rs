//! Password digests for registered users and admin credentials
//!
//! Passwords are never stored. Each is kept as
//! base64(HMAC-SHA256(secret, username || 0x00 || password)), and checks go
//! through `Mac::verify_slice` so comparison is constant time.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const GENERATED_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credential secret: {0}")]
    InvalidSecret(String),
}

/// Keyed password hasher shared by the user and admin tables
#[derive(Clone)]
pub struct CredentialHasher {
    secret: Vec<u8>,
}

impl CredentialHasher {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { secret: secret.into() }
    }

    /// Hasher with a random per-process key
    pub fn random() -> Self {
        let mut secret = vec![0u8; GENERATED_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut secret);
        Self { secret }
    }

    fn mac(&self, username: &str, password: &str) -> Result<HmacSha256, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::InvalidSecret(e.to_string()))?;
        mac.update(username.as_bytes());
        mac.update(&[0]);
        mac.update(password.as_bytes());
        Ok(mac)
    }

    pub fn digest(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let mac = self.mac(username, password)?;
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    pub fn verify(&self, username: &str, password: &str, digest: &str) -> bool {
        let Ok(expected) = BASE64.decode(digest) else {
            return false;
        };
        match self.mac(username, password) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_round_trip() {
        let hasher = CredentialHasher::new("test-secret");
        let digest = hasher.digest("admin", "admin123").unwrap();
        assert!(hasher.verify("admin", "admin123", &digest));
        assert!(!hasher.verify("admin", "admin124", &digest));
        assert!(!hasher.verify("admin2", "admin123", &digest));
    }

    #[test]
    fn test_digest_depends_on_secret() {
        let a = CredentialHasher::new("one");
        let b = CredentialHasher::new("two");
        assert_ne!(a.digest("u", "p").unwrap(), b.digest("u", "p").unwrap());

        let r1 = CredentialHasher::random();
        let r2 = CredentialHasher::random();
        assert_ne!(r1.digest("u", "p").unwrap(), r2.digest("u", "p").unwrap());
    }

    #[test]
    fn test_garbage_digest_rejected() {
        let hasher = CredentialHasher::new("s");
        assert!(!hasher.verify("u", "p", "not base64!!"));
    }

    #[test]
    fn test_field_boundary() {
        // "ab" + "c" must not collide with "a" + "bc"
        let hasher = CredentialHasher::new("s");
        assert_ne!(hasher.digest("ab", "c").unwrap(), hasher.digest("a", "bc").unwrap());
    }
}
