use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Username or email already registered")]
    DuplicateIdentity,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    #[error("API key with this value already exists")]
    DuplicateKey,

    #[error("Upstream request timed out")]
    GatewayTimeout,

    #[error("Upstream unreachable: {0}")]
    BadGateway(String),

    #[error("Upstream returned {status}")]
    Upstream { status: u16, body: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    DatabaseError,
    DuplicateIdentity,
    InvalidCredentials,
    Unauthorized,
    InvalidInput,
    NotFound,
    DuplicateKey,
    GatewayTimeout,
    BadGateway,
    UpstreamError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::DuplicateIdentity => "DUPLICATE_IDENTITY",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DuplicateKey => "DUPLICATE_KEY",
            ErrorCode::GatewayTimeout => "GATEWAY_TIMEOUT",
            ErrorCode::BadGateway => "BAD_GATEWAY",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
