//! In-memory implementation of every repository trait.
//!
//! One store backs users, sessions, keys and usage so that joins
//! (session -> user, key -> owner) behave like the Postgres adapter.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        api_key::{ApiKeyRepo, ApiKeyWithOwner},
        proxy::UsageLogRepo,
        user::{SessionRepo, SessionWithUser, UserRepo},
    },
    domain::entities::{
        api_key::ApiKey,
        session_token::SessionToken,
        usage_log::{ProxyEndpoint, UsageLogEntry},
        user::User,
    },
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    sessions: Vec<SessionToken>,
    /// Insertion sequence breaks `created_at` ties when listing.
    keys: Vec<(u64, ApiKey)>,
    next_key_seq: u64,
    usage: Vec<UsageLogEntry>,
    fail_next_key_insert: bool,
    fail_usage_writes: bool,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> User {
        self.state.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn set_user_active(&self, user_id: Uuid, is_active: bool) {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.is_active = is_active;
        }
    }

    pub fn expire_sessions_of(&self, user_id: Uuid, expires_at: NaiveDateTime) {
        let mut state = self.state.lock().unwrap();
        for session in state.sessions.iter_mut().filter(|s| s.user_id == user_id) {
            session.expires_at = expires_at;
        }
    }

    pub fn set_key_expiry(&self, key_id: Uuid, expires_at: Option<NaiveDateTime>) {
        let mut state = self.state.lock().unwrap();
        if let Some((_, key)) = state.keys.iter_mut().find(|(_, k)| k.id == key_id) {
            key.expires_at = expires_at;
        }
    }

    /// The next key insert fails as if its hash already existed.
    pub fn fail_next_key_insert_as_duplicate(&self) {
        self.state.lock().unwrap().fail_next_key_insert = true;
    }

    pub fn fail_usage_writes(&self) {
        self.state.lock().unwrap().fail_usage_writes = true;
    }

    pub fn usage_entries(&self) -> Vec<UsageLogEntry> {
        self.state.lock().unwrap().usage.clone()
    }

    fn user_by_id(state: &State, user_id: Uuid) -> Option<User> {
        state.users.iter().find(|u| u.id == user_id).cloned()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl UserRepo for InMemoryStore {
    async fn create(&self, username: &str, email: &str, password_hash: &str) -> AppResult<User> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(AppError::DuplicateIdentity);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now(),
            is_active: true,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }
}

#[async_trait]
impl SessionRepo for InMemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        created_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> AppResult<SessionToken> {
        let session = SessionToken {
            id: Uuid::new_v4(),
            user_id,
            token_hash: token_hash.to_string(),
            created_at,
            expires_at,
        };
        self.state.lock().unwrap().sessions.push(session.clone());
        Ok(session)
    }

    async fn get_with_user(&self, token_hash: &str) -> AppResult<Option<SessionWithUser>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .sessions
            .iter()
            .find(|s| s.token_hash == token_hash)
            .and_then(|session| {
                Self::user_by_id(&state, session.user_id).map(|user| SessionWithUser {
                    session: session.clone(),
                    user,
                })
            }))
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.sessions.len();
        state.sessions.retain(|s| s.user_id != user_id);
        Ok((before - state.sessions.len()) as u64)
    }
}

#[async_trait]
impl ApiKeyRepo for InMemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        key_prefix: &str,
        key_hash: &str,
        expires_at: Option<NaiveDateTime>,
    ) -> AppResult<ApiKey> {
        let mut state = self.state.lock().unwrap();
        if std::mem::take(&mut state.fail_next_key_insert)
            || state.keys.iter().any(|(_, k)| k.key_hash == key_hash)
        {
            return Err(AppError::DuplicateKey);
        }
        let key = ApiKey {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            key_prefix: key_prefix.to_string(),
            key_hash: key_hash.to_string(),
            created_at: now(),
            expires_at,
            is_active: true,
        };
        let seq = state.next_key_seq;
        state.next_key_seq += 1;
        state.keys.push((seq, key.clone()));
        Ok(key)
    }

    async fn get_with_owner(&self, key_hash: &str) -> AppResult<Option<ApiKeyWithOwner>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .keys
            .iter()
            .find(|(_, k)| k.key_hash == key_hash)
            .and_then(|(_, key)| {
                Self::user_by_id(&state, key.user_id).map(|owner| ApiKeyWithOwner {
                    key: key.clone(),
                    owner,
                })
            }))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiKey>> {
        let state = self.state.lock().unwrap();
        let mut keys: Vec<&(u64, ApiKey)> = state
            .keys
            .iter()
            .filter(|(_, k)| k.user_id == user_id)
            .collect();
        keys.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });
        Ok(keys.into_iter().map(|(_, k)| k.clone()).collect())
    }

    async fn delete(&self, user_id: Uuid, key_id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.keys.len();
        state
            .keys
            .retain(|(_, k)| !(k.id == key_id && k.user_id == user_id));
        Ok(state.keys.len() < before)
    }

    async fn toggle(&self, user_id: Uuid, key_id: Uuid) -> AppResult<Option<bool>> {
        let mut state = self.state.lock().unwrap();
        Ok(state
            .keys
            .iter_mut()
            .find(|(_, k)| k.id == key_id && k.user_id == user_id)
            .map(|(_, key)| {
                key.is_active = !key.is_active;
                key.is_active
            }))
    }
}

#[async_trait]
impl UsageLogRepo for InMemoryStore {
    async fn record(
        &self,
        user_id: Uuid,
        api_key_id: Uuid,
        endpoint: ProxyEndpoint,
    ) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_usage_writes {
            return Err(AppError::Database("usage log unavailable".into()));
        }
        state.usage.push(UsageLogEntry {
            id: Uuid::new_v4(),
            user_id,
            api_key_id,
            endpoint: endpoint.as_str().to_string(),
            timestamp: now(),
        });
        Ok(())
    }
}
