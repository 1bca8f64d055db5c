pub mod api_key;
pub mod session_token;
pub mod usage_log;
pub mod user;
