use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Map, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::domain::entities::usage_log::ProxyEndpoint;

// ============================================================================
// Ports
// ============================================================================

/// The single upstream chat service.
///
/// Bodies travel as the exact JSON text sent and received; nothing is
/// re-serialized. Implementations map a timeout to `GatewayTimeout`, a failed
/// connection or a non-JSON reply to `BadGateway` and any non-success status
/// to `Upstream { status, body }`.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn chat_completions(&self, body: &str) -> AppResult<String>;
    async fn list_models(&self) -> AppResult<String>;
}

/// True when `text` is one well-formed JSON document.
pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

#[async_trait]
pub trait UsageLogRepo: Send + Sync {
    async fn record(&self, user_id: Uuid, api_key_id: Uuid, endpoint: ProxyEndpoint)
    -> AppResult<()>;
}

// ============================================================================
// Request Envelope
// ============================================================================

/// Chat completion envelope, used to validate a body before it is forwarded.
/// `messages` must be a non-empty array and `stream` must not be `true`;
/// other fields are accepted as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub messages: Vec<Value>,
    #[serde(default)]
    pub stream: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatCompletionRequest {
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| AppError::InvalidInput("Request body must be valid JSON".into()))?;

        let Some(object) = value.as_object() else {
            return Err(AppError::InvalidInput(
                "Request body must be a JSON object".into(),
            ));
        };
        if !object.contains_key("messages") {
            return Err(AppError::InvalidInput("Field 'messages' is required".into()));
        }

        let request: Self = serde_json::from_value(value)
            .map_err(|e| AppError::InvalidInput(format!("Invalid chat request: {e}")))?;

        if request.messages.is_empty() {
            return Err(AppError::InvalidInput(
                "Field 'messages' must not be empty".into(),
            ));
        }
        if request.stream == Some(true) {
            return Err(AppError::InvalidInput(
                "Streaming responses are not supported".into(),
            ));
        }

        Ok(request)
    }
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct ProxyUseCases {
    upstream: Arc<dyn UpstreamClient>,
    usage_log: Arc<dyn UsageLogRepo>,
}

impl ProxyUseCases {
    pub fn new(upstream: Arc<dyn UpstreamClient>, usage_log: Arc<dyn UsageLogRepo>) -> Self {
        Self {
            upstream,
            usage_log,
        }
    }

    /// Callers must have validated the API key already. The body is forwarded
    /// byte for byte and the upstream reply is returned unchanged.
    #[instrument(skip(self, body))]
    pub async fn chat_completions(
        &self,
        user_id: Uuid,
        api_key_id: Uuid,
        body: &[u8],
    ) -> AppResult<String> {
        let request = ChatCompletionRequest::parse(body)?;
        let body = std::str::from_utf8(body)
            .map_err(|_| AppError::InvalidInput("Request body must be UTF-8".into()))?;
        tracing::debug!(model = request.model.as_deref(), "Forwarding chat completion");

        self.record_usage(user_id, api_key_id, ProxyEndpoint::ChatCompletions)
            .await;

        self.upstream.chat_completions(body).await
    }

    #[instrument(skip(self))]
    pub async fn list_models(&self, user_id: Uuid, api_key_id: Uuid) -> AppResult<String> {
        self.record_usage(user_id, api_key_id, ProxyEndpoint::Models)
            .await;

        self.upstream.list_models().await
    }

    /// Best effort: a failed write never fails the proxied call.
    async fn record_usage(&self, user_id: Uuid, api_key_id: Uuid, endpoint: ProxyEndpoint) {
        if let Err(err) = self.usage_log.record(user_id, api_key_id, endpoint).await {
            tracing::warn!(error = ?err, %endpoint, "Failed to record API usage");
        }
    }
}
