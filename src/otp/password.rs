//! Argon2 password hashing for accounts held by the in-memory service.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};

pub(crate) fn hash_password(password: &SecretString) -> Result<String> {
    let mut salt = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|err| anyhow!("failed to generate password salt: {err}"))?;
    let salt = SaltString::encode_b64(&salt).map_err(|err| anyhow!("invalid salt: {err}"))?;

    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?;

    Ok(hash.to_string())
}

/// Hash on the blocking pool; argon2 is CPU-bound.
pub(crate) async fn hash_password_blocking(password: SecretString) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")?
}

pub(crate) async fn verify_password_blocking(password: String, stored_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .unwrap_or(false)
}

pub(crate) fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() -> Result<()> {
        let hash = hash_password(&SecretString::from("correct horse".to_string()))?;
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> Result<()> {
        let password = SecretString::from("same-password".to_string());
        assert_ne!(hash_password(&password)?, hash_password(&password)?);
        Ok(())
    }

    #[tokio::test]
    async fn blocking_variants_agree_with_sync_ones() -> Result<()> {
        let hash = hash_password_blocking(SecretString::from("off-runtime".to_string())).await?;
        assert!(verify_password("off-runtime", &hash));
        assert!(verify_password_blocking("off-runtime".to_string(), hash.clone()).await);
        assert!(!verify_password_blocking("on-runtime".to_string(), hash).await);
        Ok(())
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
