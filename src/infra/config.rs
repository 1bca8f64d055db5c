use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

use crate::application::password::DEFAULT_ITERATIONS;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub cors_origin: HeaderValue,
    /// Base URL of the chat-completion service, e.g. "https://api.deepseek.com".
    pub upstream_base_url: Url,
    /// Credential sent upstream. Callers' own API keys are never forwarded.
    pub upstream_api_key: Option<SecretString>,
    pub session_ttl: chrono::Duration,
    pub chat_timeout: std::time::Duration,
    pub models_timeout: std::time::Duration,
    /// Must not change once users exist; stored hashes do not record it.
    pub password_hash_iterations: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "0.0.0.0:1101".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let database_max_connections: u32 = get_env_default("DATABASE_MAX_CONNECTIONS", 5);
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:1102"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let upstream_base_url: Url = get_env_default(
            "UPSTREAM_BASE_URL",
            "https://api.deepseek.com".parse().unwrap(),
        );
        let upstream_api_key: Option<SecretString> = std::env::var("UPSTREAM_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| SecretString::new(s.into()));

        let session_ttl_hours: i64 = get_env_default("SESSION_TTL_HOURS", 24);
        let chat_timeout_secs: u64 = get_env_default("CHAT_TIMEOUT_SECS", 60);
        let models_timeout_secs: u64 = get_env_default("MODELS_TIMEOUT_SECS", 30);
        let password_hash_iterations: u32 =
            get_env_default("PASSWORD_HASH_ITERATIONS", DEFAULT_ITERATIONS);

        Self {
            bind_addr,
            database_url,
            database_max_connections,
            cors_origin,
            upstream_base_url,
            upstream_api_key,
            session_ttl: session_ttl_from_hours(session_ttl_hours),
            chat_timeout: std::time::Duration::from_secs(chat_timeout_secs),
            models_timeout: std::time::Duration::from_secs(models_timeout_secs),
            password_hash_iterations,
        }
    }
}

fn session_ttl_from_hours(hours: i64) -> chrono::Duration {
    assert!(hours > 0, "SESSION_TTL_HOURS must be positive");
    chrono::Duration::try_hours(hours).expect("SESSION_TTL_HOURS out of range")
}
