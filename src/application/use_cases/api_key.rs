use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::validators::{MAX_EXPIRES_IN_DAYS, MAX_KEY_NAME_LEN};
use crate::domain::entities::{api_key::ApiKey, user::User};

pub const API_KEY_PREFIX: &str = "wr_";

/// Characters of the raw key kept for display ("wr_" + 8).
const DISPLAY_PREFIX_LEN: usize = API_KEY_PREFIX.len() + 8;

// ============================================================================
// Repository Trait
// ============================================================================

/// Mutations take the owner so that another user's key id never matches.
#[async_trait]
pub trait ApiKeyRepo: Send + Sync {
    /// Fails with `DuplicateKey` when `key_hash` already exists.
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        key_prefix: &str,
        key_hash: &str,
        expires_at: Option<NaiveDateTime>,
    ) -> AppResult<ApiKey>;

    async fn get_with_owner(&self, key_hash: &str) -> AppResult<Option<ApiKeyWithOwner>>;

    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiKey>>;

    /// Returns whether a row was deleted.
    async fn delete(&self, user_id: Uuid, key_id: Uuid) -> AppResult<bool>;

    /// Flips `is_active` and returns the new value, or `None` when no row matched.
    async fn toggle(&self, user_id: Uuid, key_id: Uuid) -> AppResult<Option<bool>>;
}

/// ApiKey with its owner, for validation
#[derive(Debug, Clone)]
pub struct ApiKeyWithOwner {
    pub key: ApiKey,
    pub owner: User,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct ApiKeyUseCases {
    api_key_repo: Arc<dyn ApiKeyRepo>,
}

impl ApiKeyUseCases {
    pub fn new(api_key_repo: Arc<dyn ApiKeyRepo>) -> Self {
        Self { api_key_repo }
    }

    /// Create a new API key for `owner_id`.
    /// Returns the stored key and the raw key (shown only once).
    /// `expires_in_days` of `None` or `Some(0)` means the key never expires.
    #[instrument(skip(self))]
    pub async fn create_api_key(
        &self,
        owner_id: Uuid,
        name: &str,
        expires_in_days: Option<i64>,
    ) -> AppResult<(ApiKey, String)> {
        let name = name.trim();
        let name = if name.is_empty() { "Default" } else { name };
        if name.chars().count() > MAX_KEY_NAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "Key name must be at most {MAX_KEY_NAME_LEN} characters"
            )));
        }

        let expires_at = match expires_in_days {
            None | Some(0) => None,
            Some(days) if (1..=MAX_EXPIRES_IN_DAYS).contains(&days) => {
                Some(Utc::now().naive_utc() + Duration::days(days))
            }
            Some(_) => {
                return Err(AppError::InvalidInput(format!(
                    "expires_in_days must be between 1 and {MAX_EXPIRES_IN_DAYS}"
                )));
            }
        };

        let raw_key = generate_api_key();
        let key_prefix = &raw_key[..DISPLAY_PREFIX_LEN];
        let key_hash = hash_api_key(&raw_key);

        let key = self
            .api_key_repo
            .create(owner_id, name, key_prefix, &key_hash, expires_at)
            .await?;

        tracing::info!(key_id = %key.id, ?expires_at, "API key created");
        Ok((key, raw_key))
    }

    #[instrument(skip(self))]
    pub async fn list_api_keys(&self, owner_id: Uuid) -> AppResult<Vec<ApiKey>> {
        self.api_key_repo.list_by_user(owner_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_api_key(&self, owner_id: Uuid, key_id: Uuid) -> AppResult<()> {
        if !self.api_key_repo.delete(owner_id, key_id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Returns the new `is_active` value.
    #[instrument(skip(self))]
    pub async fn toggle_api_key(&self, owner_id: Uuid, key_id: Uuid) -> AppResult<bool> {
        self.api_key_repo
            .toggle(owner_id, key_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

// ============================================================================
// Key Generation
// ============================================================================

/// Generate a new API key with format: wr_<32 hex chars>
fn generate_api_key() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("{}{}", API_KEY_PREFIX, hex::encode(bytes))
}

/// Hash an API key using SHA-256, returning hex-encoded hash.
pub(crate) fn hash_api_key(raw_key: &str) -> String {
    let hash = Sha256::digest(raw_key.as_bytes());
    hex::encode(hash)
}
