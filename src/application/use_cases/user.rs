use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use chrono::{Duration, NaiveDateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::password::PasswordHasher;
use crate::application::use_cases::api_key::{ApiKeyRepo, hash_api_key};
use crate::application::validators::{
    MIN_PASSWORD_LEN, is_valid_email, is_valid_password, is_valid_username,
};
use crate::domain::entities::{session_token::SessionToken, user::User};

pub const TOKEN_TYPE: &str = "bearer";

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `DuplicateIdentity` when username or email is taken.
    async fn create(&self, username: &str, email: &str, password_hash: &str) -> AppResult<User>;
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool>;
}

#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        created_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> AppResult<SessionToken>;
    async fn get_with_user(&self, token_hash: &str) -> AppResult<Option<SessionWithUser>>;
    async fn delete_all_for_user(&self, user_id: Uuid) -> AppResult<u64>;
}

/// Session row joined to its owner, for bearer authentication.
#[derive(Debug, Clone)]
pub struct SessionWithUser {
    pub session: SessionToken,
    pub user: User,
}

/// A freshly issued bearer token. `access_token` is the only copy of the raw value.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

/// Owner and key id of an API key that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedApiKey {
    pub user: User,
    pub api_key_id: Uuid,
}

#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepo>,
    sessions: Arc<dyn SessionRepo>,
    api_keys: Arc<dyn ApiKeyRepo>,
    hasher: PasswordHasher,
    session_ttl: Duration,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepo>,
        sessions: Arc<dyn SessionRepo>,
        api_keys: Arc<dyn ApiKeyRepo>,
        hasher: PasswordHasher,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            api_keys,
            hasher,
            session_ttl,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        let email = email.trim().to_lowercase();

        if !is_valid_username(username) {
            return Err(AppError::InvalidInput(
                "Username must be 3-50 characters of letters, digits, '.', '-' or '_'".into(),
            ));
        }
        if !is_valid_email(&email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }
        if !is_valid_password(password) {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self
            .users
            .exists_by_username_or_email(username, &email)
            .await?
        {
            return Err(AppError::DuplicateIdentity);
        }

        let password_hash = self.hasher.hash_blocking(password).await?;
        let user = self.users.create(username, &email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let Some(user) = self.users.get_by_username(username.trim()).await? else {
            return Err(AppError::InvalidCredentials);
        };

        if !user.is_active {
            return Err(AppError::InvalidCredentials);
        }

        if !self
            .hasher
            .verify_blocking(password, &user.password_hash)
            .await?
        {
            return Err(AppError::InvalidCredentials);
        }

        let raw = generate_token();
        let created_at = Utc::now().naive_utc();
        let expires_at = created_at + self.session_ttl;
        self.sessions
            .create(user.id, &hash_token(&raw), created_at, expires_at)
            .await?;

        tracing::info!(user_id = %user.id, %expires_at, "Session issued");
        Ok(IssuedToken {
            access_token: raw,
            token_type: TOKEN_TYPE,
            created_at,
            expires_at,
        })
    }

    /// Resolves a bearer token to its active owner.
    #[instrument(skip_all)]
    pub async fn authenticate_bearer(&self, token: &str) -> AppResult<User> {
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        let Some(found) = self.sessions.get_with_user(&hash_token(token)).await? else {
            return Err(AppError::Unauthorized);
        };

        let now = Utc::now().naive_utc();
        if found.session.expires_at <= now || !found.user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(found.user)
    }

    /// Deletes every session of the user, not only the one used for the call.
    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: Uuid) -> AppResult<u64> {
        let removed = self.sessions.delete_all_for_user(user_id).await?;
        tracing::info!(%user_id, removed, "Sessions revoked");
        Ok(removed)
    }

    #[instrument(skip_all)]
    pub async fn validate_api_key(&self, raw_key: &str) -> AppResult<Option<ValidatedApiKey>> {
        if raw_key.is_empty() {
            return Ok(None);
        }

        let Some(found) = self.api_keys.get_with_owner(&hash_api_key(raw_key)).await? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();
        if !found.key.is_active || !found.owner.is_active || found.key.is_expired_at(now) {
            return Ok(None);
        }

        Ok(Some(ValidatedApiKey {
            api_key_id: found.key.id,
            user: found.owner,
        }))
    }
}

fn generate_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let out = hasher.finalize();
    hex::encode(out)
}
