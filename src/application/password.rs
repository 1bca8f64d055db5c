//! Salted PBKDF2-HMAC-SHA256 password hashing.
//!
//! Stored credentials have the form `salt_hex:hash_hex`. The iteration count
//! is part of the hasher, not of the stored string, so it must stay fixed for
//! the lifetime of a database.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

use crate::app_error::{AppError, AppResult};

pub const DEFAULT_ITERATIONS: u32 = 100_000;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        let hash = self.derive(password, &salt);
        format!("{}:{}", hex::encode(salt), hex::encode(hash))
    }

    /// Returns `Ok(false)` for a wrong password and an error only when the
    /// stored credential is malformed.
    pub fn verify(&self, password: &str, stored: &str) -> AppResult<bool> {
        let (salt_hex, hash_hex) = stored
            .split_once(':')
            .ok_or_else(|| AppError::Internal("Malformed password hash".into()))?;
        let salt = hex::decode(salt_hex)
            .map_err(|_| AppError::Internal("Malformed password salt".into()))?;

        let computed = hex::encode(self.derive(password, &salt));
        Ok(constant_time_compare(&computed, hash_hex))
    }

    /// Runs [`Self::hash`] on the blocking pool.
    pub async fn hash_blocking(&self, password: &str) -> AppResult<String> {
        let hasher = *self;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))
    }

    /// Runs [`Self::verify`] on the blocking pool.
    pub async fn verify_blocking(&self, password: &str, stored: &str) -> AppResult<bool> {
        let hasher = *self;
        let password = password.to_string();
        let stored = stored.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))?
    }

    fn derive(&self, password: &str, salt: &[u8]) -> [u8; HASH_LEN] {
        let mut out = [0u8; HASH_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, self.iterations, &mut out);
        out
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
