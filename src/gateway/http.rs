//! HTTP gateway for the shop assistant service.
//!
//! Three endpoints, all relative to the configured base URL:
//! - `POST /api/chat`: one message in, one reply out
//! - `POST /api/conversation/clear`: drop server-side history
//! - `GET /api/conversation/history`: recent server-side history
//!
//! Every request is bounded by the client timeout; a timeout surfaces as
//! `GatewayError::Network` like any other transport failure.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};

use crate::gateway::types::{
    ChatReply, ChatRequest, ConversationStats, HistoryRecord, Language, MessageEntry,
    RawChatReply, parse_timestamp,
};
use crate::gateway::{ChatGateway, GatewayError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maps a reqwest transport error. Timeouts get a clearer message.
fn network_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Network(format!("request timed out: {e}"))
    } else {
        GatewayError::Network(e.to_string())
    }
}

/// Validates a raw payload into a `ChatReply`.
fn into_reply(raw: RawChatReply) -> Result<ChatReply, GatewayError> {
    let response = raw
        .response
        .ok_or_else(|| GatewayError::Parse("reply is missing the `response` field".to_string()))?;

    let timestamp = match raw.timestamp.as_deref().map(|ts| (ts, parse_timestamp(ts))) {
        Some((_, Some(ts))) => ts,
        Some((ts, None)) => {
            warn!("Unparseable reply timestamp {:?}, using receive time", ts);
            Utc::now()
        }
        None => {
            warn!("Reply has no timestamp, using receive time");
            Utc::now()
        }
    };

    let language = raw.language.as_deref().and_then(|code| {
        let parsed = Language::from_code(code);
        if parsed.is_none() {
            debug!("Ignoring unknown language hint {:?}", code);
        }
        parsed
    });

    // Stats are informational; a malformed block is dropped, not an error.
    let stats = raw
        .conversation_stats
        .and_then(|v| serde_json::from_value::<ConversationStats>(v).ok());

    Ok(ChatReply {
        response,
        timestamp,
        language,
        stats,
    })
}

pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        info!(
            "Chat request: message_len={}, language={}, history_length={}",
            request.message.len(),
            request.context.language.code(),
            request.context.history_length
        );

        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await
            .map_err(network_error)?;

        debug!("Chat response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat API error: {} - {}", status, err_body);
            return Err(GatewayError::Api {
                status,
                message: err_body,
            });
        }

        let body = response.text().await.map_err(network_error)?;
        let raw: RawChatReply =
            serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))?;
        let reply = into_reply(raw)?;

        info!(
            "Chat reply: {} chars, language={:?}",
            reply.response.chars().count(),
            reply.language
        );
        Ok(reply)
    }

    async fn clear_history(&self) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/api/conversation/clear"))
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response.text().await.unwrap_or_default();
            warn!("Clear API error: {} - {}", status, err_body);
            return Err(GatewayError::Api {
                status,
                message: err_body,
            });
        }

        info!("Server-side conversation cleared");
        Ok(())
    }

    async fn fetch_history(&self) -> Vec<MessageEntry> {
        let response = match self.client.get(self.url("/api/conversation/history")).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("History fetch failed with HTTP {}", r.status());
                return Vec::new();
            }
            Err(e) => {
                warn!("History fetch failed: {}", e);
                return Vec::new();
            }
        };

        match response.json::<Vec<HistoryRecord>>().await {
            Ok(records) => {
                info!("Fetched {} history records", records.len());
                records.into_iter().map(HistoryRecord::into_entry).collect()
            }
            Err(e) => {
                warn!("History payload malformed: {}", e);
                Vec::new()
            }
        }
    }
}
