use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Database(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError, None)
            }
            AppError::DuplicateIdentity => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::DuplicateIdentity,
                Some("Username or email already registered".into()),
            ),
            AppError::InvalidCredentials => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::InvalidCredentials, None)
            }
            AppError::Unauthorized => {
                error_resp(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, None)
            }
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, Some(msg))
            }
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, None),
            AppError::DuplicateKey => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::DuplicateKey,
                Some("API key with this value already exists".into()),
            ),
            AppError::GatewayTimeout => {
                error_resp(StatusCode::GATEWAY_TIMEOUT, ErrorCode::GatewayTimeout, None)
            }
            AppError::BadGateway(msg) => {
                error_resp(StatusCode::BAD_GATEWAY, ErrorCode::BadGateway, Some(msg))
            }
            AppError::Upstream { status, body } => {
                // Upstream status is passed through; anything unrepresentable becomes 502.
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                error_resp(status, ErrorCode::UpstreamError, Some(body))
            }
            AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError, None)
            }
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}
