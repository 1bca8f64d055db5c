use crate::{
    adapters::{http::app_state::AppState, upstream::HttpUpstreamClient},
    application::password::PasswordHasher,
    infra::{config::AppConfig, error::InfraError, http_client, postgres_persistence},
    use_cases::{
        api_key::{ApiKeyRepo, ApiKeyUseCases},
        proxy::{ProxyUseCases, UsageLogRepo},
        user::{AuthUseCases, SessionRepo, UserRepo},
    },
};
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(
        postgres_persistence(&config.database_url, config.database_max_connections).await?,
    );

    let user_repo_arc = postgres_arc.clone() as Arc<dyn UserRepo>;
    let session_repo_arc = postgres_arc.clone() as Arc<dyn SessionRepo>;
    let api_key_repo_arc = postgres_arc.clone() as Arc<dyn ApiKeyRepo>;
    let usage_repo_arc = postgres_arc.clone() as Arc<dyn UsageLogRepo>;

    let client = http_client::try_build_client().map_err(InfraError::HttpClient)?;
    let upstream = Arc::new(HttpUpstreamClient::new(
        client,
        config.upstream_base_url.clone(),
        config.upstream_api_key.clone(),
        config.chat_timeout,
        config.models_timeout,
    ));

    let auth_use_cases = AuthUseCases::new(
        user_repo_arc,
        session_repo_arc,
        api_key_repo_arc.clone(),
        PasswordHasher::new(config.password_hash_iterations),
        config.session_ttl,
    );
    let api_key_use_cases = ApiKeyUseCases::new(api_key_repo_arc);
    let proxy_use_cases = ProxyUseCases::new(upstream, usage_repo_arc);

    tracing::info!(upstream = %config.upstream_base_url, "Application state initialized");

    Ok(AppState {
        config: Arc::new(config),
        auth_use_cases: Arc::new(auth_use_cases),
        api_key_use_cases: Arc::new(api_key_use_cases),
        proxy_use_cases: Arc::new(proxy_use_cases),
    })
}

/// Console logs always; JSON file logs when `LOG_FILE` is set.
pub fn init_tracing() -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "windex_router=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let json_layer = match std::env::var("LOG_FILE").ok() {
        Some(path) => {
            let file = File::create(&path).map_err(|source| InfraError::LogFile {
                path: path.clone(),
                source,
            })?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(true)
                    .with_span_list(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
