//! Test data factories.
//!
//! Each factory returns a complete, valid object. Use the closure parameter
//! to override specific fields.

use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{application::password::PasswordHasher, domain::entities::user::User};

/// Plaintext password of every user built by `create_test_user`.
pub const TEST_PASSWORD: &str = "secret1";

/// Keeps PBKDF2 cheap in tests. Hashes carry no iteration count, so every
/// hasher in a test must use this value.
pub const TEST_HASH_ITERATIONS: u32 = 10;

pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(TEST_HASH_ITERATIONS)
}

/// Create a test user with sensible defaults and `TEST_PASSWORD` as password.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        email: "a@x.com".to_string(),
        password_hash: test_hasher().hash(TEST_PASSWORD),
        created_at: test_datetime(),
        is_active: true,
    };
    overrides(&mut user);
    user
}

/// Fixed datetime for deterministic fixtures.
pub fn test_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// Wall-clock now shifted by `days` (negative for the past).
pub fn now_offset_days(days: i64) -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::days(days)
}
