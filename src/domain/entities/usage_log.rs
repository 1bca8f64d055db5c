use std::fmt;

use chrono::NaiveDateTime;
use uuid::Uuid;

/// Proxied endpoints recorded in the usage log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyEndpoint {
    ChatCompletions,
    Models,
}

impl ProxyEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyEndpoint::ChatCompletions => "chat/completions",
            ProxyEndpoint::Models => "models",
        }
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct UsageLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub api_key_id: Uuid,
    pub endpoint: String,
    pub timestamp: NaiveDateTime,
}
