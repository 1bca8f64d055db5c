use axum::{
    Extension, Router,
    body::Bytes,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    adapters::http::{app_state::AppState, middleware::ApiKeyContext},
    app_error::AppResult,
};

/// Returns a router for the upstream passthrough endpoints.
/// Note: The api_key_auth middleware is applied in mod.rs when nesting this router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat/completions", post(chat_completions))
        .route("/models", get(list_models))
}

/// POST /api/deepseek/chat/completions
/// The body is validated here and forwarded; the upstream JSON is returned verbatim.
async fn chat_completions(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<ApiKeyContext>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let reply = app_state
        .proxy_use_cases
        .chat_completions(ctx.user_id, ctx.api_key_id, &body)
        .await?;
    Ok(json_text(reply))
}

/// GET /api/deepseek/models
async fn list_models(
    State(app_state): State<AppState>,
    Extension(ctx): Extension<ApiKeyContext>,
) -> AppResult<impl IntoResponse> {
    let reply = app_state
        .proxy_use_cases
        .list_models(ctx.user_id, ctx.api_key_id)
        .await?;
    Ok(json_text(reply))
}

/// Already-validated JSON text, sent without re-encoding.
fn json_text(body: String) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}
