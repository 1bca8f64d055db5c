use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{CurrentUser, session_auth},
    },
    app_error::AppResult,
    domain::entities::user::User,
};

#[derive(Deserialize)]
struct RegisterPayload {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    username: String,
    password: String,
}

#[derive(Serialize)]
pub(crate) struct UserResponse {
    id: Uuid,
    username: String,
    email: String,
    created_at: NaiveDateTime,
    is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            is_active: user.is_active,
        }
    }
}

#[derive(Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
    expires_at: NaiveDateTime,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(app_state, session_auth))
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .register(&payload.username, &payload.email, &payload.password)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let token = app_state
        .auth_use_cases
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(TokenResponse {
        access_token: token.access_token,
        token_type: token.token_type,
        expires_at: token.expires_at,
    }))
}

async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
    Json(UserResponse::from(user))
}

async fn logout(
    State(app_state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    app_state.auth_use_cases.logout(user.id).await?;
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}
