use std::fmt;

use async_trait::async_trait;

use super::types::{ChatReply, ChatRequest, MessageEntry};

/// Errors that can occur while talking to the chat service.
///
/// The send cycle shows the same apology for all of them; the variant only
/// matters for logs.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Transport failure: DNS, connection refused, timeout.
    Network(String),
    /// Service answered with a non-success status.
    Api { status: u16, message: String },
    /// Service answered 2xx but the payload is unusable (not JSON, no `response`).
    Parse(String),
}

impl GatewayError {
    /// Coarse classification for logs: "network" or "protocol".
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Network(_) => "network",
            GatewayError::Api { .. } | GatewayError::Parse(_) => "protocol",
        }
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Network(msg) => write!(f, "network error: {msg}"),
            GatewayError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            GatewayError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Returns the name of the gateway (for logs).
    fn name(&self) -> &str;

    /// Sends one message and waits for the reply.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError>;

    /// Discards the server-side conversation. Safe to call repeatedly.
    async fn clear_history(&self) -> Result<(), GatewayError>;

    /// Best-effort fetch of server-side history; any failure yields an empty list.
    async fn fetch_history(&self) -> Vec<MessageEntry>;
}
