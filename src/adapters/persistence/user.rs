use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, is_unique_violation},
    app_error::{AppError, AppResult},
    domain::entities::user::User,
    use_cases::user::UserRepo,
};

// User row as stored in the db.
#[derive(sqlx::FromRow, Debug)]
pub(super) struct UserDb {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub is_active: bool,
}

impl From<UserDb> for User {
    fn from(row: UserDb) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn create(&self, username: &str, email: &str, password_hash: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserDb>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at, is_active
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateIdentity
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserDb>(
            r#"
            SELECT id, username, email, password_hash, created_at, is_active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(User::from))
    }

    async fn exists_by_username_or_email(&self, username: &str, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(exists)
    }
}
