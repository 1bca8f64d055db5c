//! Scripted stand-in for the upstream chat service.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::proxy::UpstreamClient,
};

/// What every call to the stub produces.
#[derive(Clone, Debug)]
pub enum UpstreamBehavior {
    Respond(Value),
    /// Reply with this exact text.
    RespondRaw(String),
    Status(u16, String),
    Timeout,
    ConnectionRefused,
}

impl Default for UpstreamBehavior {
    fn default() -> Self {
        UpstreamBehavior::Respond(json!({"object": "list", "data": []}))
    }
}

pub struct StubUpstream {
    behavior: UpstreamBehavior,
    chat_requests: Mutex<Vec<String>>,
}

impl StubUpstream {
    pub fn new(behavior: UpstreamBehavior) -> Self {
        Self {
            behavior,
            chat_requests: Mutex::new(Vec::new()),
        }
    }

    /// Chat bodies received so far, in order, exactly as forwarded.
    pub fn chat_requests(&self) -> Vec<String> {
        self.chat_requests.lock().unwrap().clone()
    }

    fn reply(&self) -> AppResult<String> {
        match &self.behavior {
            UpstreamBehavior::Respond(value) => Ok(value.to_string()),
            UpstreamBehavior::RespondRaw(text) => Ok(text.clone()),
            UpstreamBehavior::Status(status, body) => Err(AppError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            UpstreamBehavior::Timeout => Err(AppError::GatewayTimeout),
            UpstreamBehavior::ConnectionRefused => {
                Err(AppError::BadGateway("Upstream service unreachable".into()))
            }
        }
    }
}

#[async_trait]
impl UpstreamClient for StubUpstream {
    async fn chat_completions(&self, body: &str) -> AppResult<String> {
        self.chat_requests.lock().unwrap().push(body.to_string());
        self.reply()
    }

    async fn list_models(&self) -> AppResult<String> {
        self.reply()
    }
}
