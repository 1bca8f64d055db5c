use chrono::NaiveDateTime;
use uuid::Uuid;

/// A bearer session issued on login. Only the SHA-256 digest of the token
/// value is stored.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}
