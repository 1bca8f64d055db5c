use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header::CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::proxy::{UpstreamClient, is_json},
};

/// Upstream chat service over HTTPS.
#[derive(Clone)]
pub struct HttpUpstreamClient {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    chat_timeout: Duration,
    models_timeout: Duration,
}

impl HttpUpstreamClient {
    pub fn new(
        client: Client,
        base_url: Url,
        api_key: Option<SecretString>,
        chat_timeout: Duration,
        models_timeout: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
            chat_timeout,
            models_timeout,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> AppResult<String> {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| map_transport_error(e, endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, endpoint))?;

        if !status.is_success() {
            tracing::warn!(%status, endpoint, body = %body, "Upstream returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        if !is_json(&body) {
            tracing::error!(endpoint, "Upstream returned invalid JSON");
            return Err(AppError::BadGateway(
                "Upstream returned an invalid response".into(),
            ));
        }

        Ok(body)
    }
}

fn map_transport_error(err: reqwest::Error, endpoint: &str) -> AppError {
    if err.is_timeout() {
        tracing::warn!(endpoint, "Upstream request timed out");
        AppError::GatewayTimeout
    } else if err.is_connect() {
        tracing::error!(endpoint, error = %err, "Upstream connection failed");
        AppError::BadGateway("Upstream service unreachable".into())
    } else {
        tracing::error!(endpoint, error = %err, "Upstream request failed");
        AppError::BadGateway("Upstream request failed".into())
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn chat_completions(&self, body: &str) -> AppResult<String> {
        let builder = self
            .client
            .post(self.endpoint("chat/completions"))
            .timeout(self.chat_timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned());
        self.send(builder, "chat/completions").await
    }

    async fn list_models(&self) -> AppResult<String> {
        let builder = self
            .client
            .get(self.endpoint("models"))
            .timeout(self.models_timeout);
        self.send(builder, "models").await
    }
}
