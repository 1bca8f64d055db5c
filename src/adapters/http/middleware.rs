use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState, app_error::AppError,
    domain::entities::user::User,
};

/// The user behind a valid session token.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Owner and key id behind a valid API key.
#[derive(Clone, Debug)]
pub struct ApiKeyContext {
    pub user_id: Uuid,
    pub api_key_id: Uuid,
}

/// Requires `Authorization: Bearer <session token>`.
pub async fn session_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or(AppError::Unauthorized)?
        .to_owned();

    let user = app_state.auth_use_cases.authenticate_bearer(&token).await?;

    tracing::debug!(user_id = %user.id, "Session authenticated");
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Requires `Authorization: Bearer <api key>`. A missing or malformed header
/// is rejected before any lookup.
pub async fn api_key_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let raw_key = bearer_token(request.headers())
        .ok_or(AppError::Unauthorized)?
        .to_owned();

    let validated = app_state
        .auth_use_cases
        .validate_api_key(&raw_key)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::debug!(
        user_id = %validated.user.id,
        api_key_id = %validated.api_key_id,
        "API key authenticated"
    );
    request.extensions_mut().insert(ApiKeyContext {
        user_id: validated.user.id,
        api_key_id: validated.api_key_id,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
