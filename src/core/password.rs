//! One-way credential hashing.
//!
//! Passwords are stored as Argon2id PHC strings with a per-password random salt.
//! Argon2 is CPU-bound, so both operations run on tokio's blocking pool.

use crate::errors::{Error, Result};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tokio::task;

/// Hashes `plain` into a PHC string suitable for storage.
pub async fn hash_password(plain: &str) -> Result<String> {
    let plain = plain.to_owned();
    task::spawn_blocking(move || hash_blocking(&plain))
        .await
        .map_err(|e| Error::PasswordHash {
            message: format!("Hashing task failed: {e}"),
        })?
}

/// Checks `plain` against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch. Only a stored hash that cannot be parsed is
/// reported as an error.
pub async fn verify_password(plain: &str, stored: &str) -> Result<bool> {
    let plain = plain.to_owned();
    let stored = stored.to_owned();
    task::spawn_blocking(move || verify_blocking(&plain, &stored))
        .await
        .map_err(|e| Error::PasswordHash {
            message: format!("Verification task failed: {e}"),
        })?
}

fn hash_blocking(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

fn verify_blocking(plain: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| Error::PasswordHash {
        message: e.to_string(),
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
