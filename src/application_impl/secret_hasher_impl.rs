use crate::application_port::OAuthError;
use crate::domain_port::SecretHasher;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Secrets stored as-is.
pub struct PlainSecretHasher;

#[async_trait::async_trait]
impl SecretHasher for PlainSecretHasher {
    async fn hash_secret(&self, secret: &str) -> Result<String, OAuthError> {
        Ok(secret.to_string())
    }

    async fn verify_secret(&self, secret: &str, stored: &str) -> Result<bool, OAuthError> {
        Ok(secret.as_bytes().ct_eq(stored.as_bytes()).into())
    }
}

/// Secrets stored as the lowercase hex SHA-256 digest.
pub struct Sha256SecretHasher;

impl Sha256SecretHasher {
    fn digest_hex(secret: &str) -> String {
        hex::encode(Sha256::digest(secret.as_bytes()))
    }
}

#[async_trait::async_trait]
impl SecretHasher for Sha256SecretHasher {
    async fn hash_secret(&self, secret: &str) -> Result<String, OAuthError> {
        Ok(Self::digest_hex(secret))
    }

    async fn verify_secret(&self, secret: &str, stored: &str) -> Result<bool, OAuthError> {
        let digest = Self::digest_hex(secret);
        Ok(digest.as_bytes().ct_eq(stored.as_bytes()).into())
    }
}

/// Secrets stored as argon2 PHC strings.
pub struct Argon2SecretHasher;

#[async_trait::async_trait]
impl SecretHasher for Argon2SecretHasher {
    async fn hash_secret(&self, secret: &str) -> Result<String, OAuthError> {
        let salt = argon2::password_hash::SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| OAuthError::InternalError(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    async fn verify_secret(&self, secret: &str, stored: &str) -> Result<bool, OAuthError> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| OAuthError::InternalError(format!("invalid PHC hash: {e}")))?;

        match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(OAuthError::InternalError(format!("verify error: {e}"))),
        }
    }
}
