//! Test app state builder for HTTP-level testing.
//!
//! `TestAppStateBuilder` wires a full `AppState` on top of `InMemoryStore`
//! and `StubUpstream`.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{api_key::ApiKeyUseCases, proxy::ProxyUseCases, user::AuthUseCases},
    domain::entities::user::User,
    infra::config::AppConfig,
    test_utils::{InMemoryStore, StubUpstream, TEST_HASH_ITERATIONS, UpstreamBehavior, test_hasher},
};

/// Config with local defaults; nothing in it is dialed during tests.
pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://localhost/unused".to_string(),
        database_max_connections: 1,
        cors_origin: HeaderValue::from_static("http://localhost:1102"),
        upstream_base_url: "http://127.0.0.1:9".parse().unwrap(),
        upstream_api_key: None,
        session_ttl: chrono::Duration::hours(24),
        chat_timeout: Duration::from_secs(60),
        models_timeout: Duration::from_secs(30),
        password_hash_iterations: TEST_HASH_ITERATIONS,
    }
}

/// Builder for creating `AppState` with in-memory mocks.
///
/// # Example
///
/// ```ignore
/// let user = create_test_user(|u| u.username = "alice".into());
/// let (app_state, store, upstream) = TestAppStateBuilder::new()
///     .with_user(user)
///     .with_upstream(UpstreamBehavior::Timeout)
///     .build_with_mocks();
/// ```
#[derive(Default)]
pub struct TestAppStateBuilder {
    users: Vec<User>,
    upstream: UpstreamBehavior,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_upstream(mut self, behavior: UpstreamBehavior) -> Self {
        self.upstream = behavior;
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    /// Also returns the store and upstream for inspection.
    pub fn build_with_mocks(self) -> (AppState, Arc<InMemoryStore>, Arc<StubUpstream>) {
        let config = test_config();

        let store = Arc::new(InMemoryStore::new());
        for user in self.users {
            store.insert_user(user);
        }
        let upstream = Arc::new(StubUpstream::new(self.upstream));

        let auth_use_cases = AuthUseCases::new(
            store.clone(),
            store.clone(),
            store.clone(),
            test_hasher(),
            config.session_ttl,
        );
        let api_key_use_cases = ApiKeyUseCases::new(store.clone());
        let proxy_use_cases = ProxyUseCases::new(upstream.clone(), store.clone());

        let app_state = AppState {
            config: Arc::new(config),
            auth_use_cases: Arc::new(auth_use_cases),
            api_key_use_cases: Arc::new(api_key_use_cases),
            proxy_use_cases: Arc::new(proxy_use_cases),
        };
        (app_state, store, upstream)
    }
}
