use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{api_key::ApiKeyUseCases, proxy::ProxyUseCases, user::AuthUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub api_key_use_cases: Arc<ApiKeyUseCases>,
    pub proxy_use_cases: Arc<ProxyUseCases>,
}
