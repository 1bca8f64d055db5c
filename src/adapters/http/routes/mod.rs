pub mod auth;
pub mod deepseek;
pub mod keys;

use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};

use crate::adapters::http::{
    app_state::AppState,
    middleware::{api_key_auth, session_auth},
};

/// Unauthenticated service info, mounted at the root.
pub fn root_router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
}

/// Everything under `/api`.
pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(app_state.clone()))
        .nest(
            "/keys",
            keys::router().route_layer(middleware::from_fn_with_state(
                app_state.clone(),
                session_auth,
            )),
        )
        .nest(
            "/deepseek",
            deepseek::router()
                .route_layer(middleware::from_fn_with_state(app_state, api_key_auth)),
        )
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "message": "WindexRouter API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
