//! HTTP client factory for upstream calls.
//!
//! The client only carries a connect timeout. Total request time is bounded
//! per call (`RequestBuilder::timeout`) because chat completions and model
//! listing have different budgets.

use reqwest::Client;
use std::time::Duration;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn try_build_client() -> Result<Client, reqwest::Error> {
    try_build_client_with_connect_timeout(DEFAULT_CONNECT_TIMEOUT)
}

pub fn try_build_client_with_connect_timeout(
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(concat!("windex-router/", env!("CARGO_PKG_VERSION")))
        .build()
}
