use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, is_unique_violation},
    app_error::{AppError, AppResult},
    domain::entities::{api_key::ApiKey, user::User},
    use_cases::api_key::{ApiKeyRepo, ApiKeyWithOwner},
};

fn row_to_key(row: &sqlx::postgres::PgRow) -> ApiKey {
    ApiKey {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        key_prefix: row.get("key_prefix"),
        key_hash: row.get("key_hash"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
        is_active: row.get("is_active"),
    }
}

#[async_trait]
impl ApiKeyRepo for PostgresPersistence {
    async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        key_prefix: &str,
        key_hash: &str,
        expires_at: Option<NaiveDateTime>,
    ) -> AppResult<ApiKey> {
        let row = sqlx::query(
            r#"
            INSERT INTO api_keys (id, user_id, name, key_prefix, key_hash, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, key_prefix, key_hash, created_at, expires_at, is_active
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(key_prefix)
        .bind(key_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateKey
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row_to_key(&row))
    }

    async fn get_with_owner(&self, key_hash: &str) -> AppResult<Option<ApiKeyWithOwner>> {
        let row = sqlx::query(
            r#"
            SELECT k.id, k.user_id, k.name, k.key_prefix, k.key_hash, k.created_at,
                   k.expires_at, k.is_active,
                   u.username, u.email, u.password_hash,
                   u.created_at AS user_created_at, u.is_active AS user_is_active
            FROM api_keys k
            JOIN users u ON u.id = k.user_id
            WHERE k.key_hash = $1
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(row.map(|row| ApiKeyWithOwner {
            key: row_to_key(&row),
            owner: User {
                id: row.get("user_id"),
                username: row.get("username"),
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                created_at: row.get("user_created_at"),
                is_active: row.get("user_is_active"),
            },
        }))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<ApiKey>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, key_prefix, key_hash, created_at, expires_at, is_active
            FROM api_keys
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.iter().map(row_to_key).collect())
    }

    async fn delete(&self, user_id: Uuid, key_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
            .bind(key_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle(&self, user_id: Uuid, key_id: Uuid) -> AppResult<Option<bool>> {
        let is_active: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE api_keys
            SET is_active = NOT is_active
            WHERE id = $1 AND user_id = $2
            RETURNING is_active
            "#,
        )
        .bind(key_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(is_active)
    }
}
