//! Argon2 credential hashing.
//!
//! Hashing is CPU-bound, so the async entry points [`hash`] and [`verify`] move
//! the work onto tokio's blocking pool.

use std::sync::OnceLock;

use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::AppError;

fn hash_blocking(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow!("hash password: {e}"))
}

fn verify_blocking(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("parse stored hash: {e}"))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Hash checked when the account does not exist, so a miss costs the same as a
/// wrong password.
fn dummy_hash() -> anyhow::Result<&'static str> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(h) = DUMMY.get() {
        return Ok(h);
    }
    let h = hash_blocking("no-such-account")?;
    Ok(DUMMY.get_or_init(|| h))
}

async fn on_blocking_pool<T, F>(what: &'static str, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow!("{what} task failed: {e}")))?
        .map_err(AppError::Internal)
}

pub async fn hash(plain: String) -> Result<String, AppError> {
    on_blocking_pool("password hashing", move || hash_blocking(&plain)).await
}

/// Checks `plain` against `stored`. A missing account always yields `false`
/// after doing the same amount of work as a real comparison.
pub async fn verify(plain: String, stored: Option<String>) -> Result<bool, AppError> {
    on_blocking_pool("password verification", move || match stored {
        Some(stored) => verify_blocking(&plain, &stored),
        None => {
            verify_blocking(&plain, dummy_hash()?)?;
            Ok(false)
        }
    })
    .await
}
