use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, post, put},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, middleware::CurrentUser},
    app_error::{AppError, AppResult},
    domain::entities::api_key::ApiKey,
};

/// Returns a router for API key management.
/// Note: session_auth is applied in mod.rs when nesting this router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_key).get(list_keys))
        .route("/{key_id}", delete(delete_key))
        .route("/{key_id}/toggle", put(toggle_key))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct CreateKeyPayload {
    name: String,
    expires_in_days: Option<i64>,
}

#[derive(Serialize)]
struct ApiKeyResponse {
    id: Uuid,
    name: String,
    /// Full key on creation; masked prefix in listings.
    key: String,
    created_at: NaiveDateTime,
    expires_at: Option<NaiveDateTime>,
    is_active: bool,
}

impl ApiKeyResponse {
    fn new(key: ApiKey, shown: String) -> Self {
        Self {
            id: key.id,
            name: key.name,
            key: shown,
            created_at: key.created_at,
            expires_at: key.expires_at,
            is_active: key.is_active,
        }
    }

    fn masked(key: ApiKey) -> Self {
        let shown = format!("{}...", key.key_prefix);
        Self::new(key, shown)
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ToggleResponse {
    message: &'static str,
    is_active: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn create_key(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateKeyPayload>,
) -> AppResult<impl IntoResponse> {
    let (key, raw_key) = app_state
        .api_key_use_cases
        .create_api_key(user.id, &payload.name, payload.expires_in_days)
        .await?;
    Ok(Json(ApiKeyResponse::new(key, raw_key)))
}

async fn list_keys(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let keys = app_state.api_key_use_cases.list_api_keys(user.id).await?;
    Ok(Json(
        keys.into_iter()
            .map(ApiKeyResponse::masked)
            .collect::<Vec<_>>(),
    ))
}

async fn delete_key(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(key_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key_id = parse_key_id(&key_id)?;
    app_state
        .api_key_use_cases
        .delete_api_key(user.id, key_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "API key deleted",
    }))
}

async fn toggle_key(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(key_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key_id = parse_key_id(&key_id)?;
    let is_active = app_state
        .api_key_use_cases
        .toggle_api_key(user.id, key_id)
        .await?;
    Ok(Json(ToggleResponse {
        message: if is_active {
            "API key activated"
        } else {
            "API key deactivated"
        },
        is_active,
    }))
}

/// A malformed id can never name an owned key.
fn parse_key_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}
