use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::{session_token::SessionToken, user::User},
    use_cases::user::{SessionRepo, SessionWithUser},
};

fn row_to_session(row: &sqlx::postgres::PgRow) -> SessionToken {
    SessionToken {
        id: row.get("id"),
        user_id: row.get("user_id"),
        token_hash: row.get("token_hash"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
    }
}

#[async_trait]
impl SessionRepo for PostgresPersistence {
    async fn create(
        &self,
        user_id: Uuid,
        token_hash: &str,
        created_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> AppResult<SessionToken> {
        let row = sqlx::query(
            r#"
            INSERT INTO tokens (id, user_id, token_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token_hash)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row_to_session(&row))
    }

    async fn get_with_user(&self, token_hash: &str) -> AppResult<Option<SessionWithUser>> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.user_id, t.token_hash, t.created_at, t.expires_at,
                   u.username, u.email, u.password_hash,
                   u.created_at AS user_created_at, u.is_active
            FROM tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|row| SessionWithUser {
            session: row_to_session(&row),
            user: User {
                id: row.get("user_id"),
                username: row.get("username"),
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                created_at: row.get("user_created_at"),
                is_active: row.get("is_active"),
            },
        }))
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected())
    }
}
