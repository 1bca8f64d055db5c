use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::usage_log::ProxyEndpoint,
    use_cases::proxy::UsageLogRepo,
};

#[async_trait]
impl UsageLogRepo for PostgresPersistence {
    async fn record(
        &self,
        user_id: Uuid,
        api_key_id: Uuid,
        endpoint: ProxyEndpoint,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO api_usage_log (id, user_id, api_key_id, endpoint) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(api_key_id)
        .bind(endpoint.as_str())
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }
}
