//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::core::config::default_quick_replies;
use crate::core::state::App;
use crate::gateway::{
    ChatGateway, ChatReply, ChatRequest, GatewayError, Language, MessageEntry,
};

/// A gateway that answers from a fixed script and records what it was sent.
pub struct ScriptedGateway {
    reply: Result<ChatReply, GatewayError>,
    clear: Result<(), GatewayError>,
    history: Vec<MessageEntry>,
    pub requests: Mutex<Vec<ChatRequest>>,
    pub clear_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(test_reply(text)),
            clear: Ok(()),
            history: Vec::new(),
            requests: Mutex::new(Vec::new()),
            clear_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: GatewayError) -> Self {
        Self {
            reply: Err(err.clone()),
            clear: Err(err),
            ..Self::replying("")
        }
    }

    pub fn with_history(mut self, history: Vec<MessageEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn sent(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn clears(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.reply.clone()
    }

    async fn clear_history(&self) -> Result<(), GatewayError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        self.clear.clone()
    }

    async fn fetch_history(&self) -> Vec<MessageEntry> {
        self.history.clone()
    }
}

/// Creates a test App: English, default brand and quick replies.
pub fn test_app() -> App {
    let mut app = App::new(Language::En, "FashionHub Kenya");
    app.quick_replies = default_quick_replies();
    app
}

/// A successful reply with a fixed timestamp and no hints.
pub fn test_reply(text: &str) -> ChatReply {
    ChatReply {
        response: text.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        language: None,
        stats: None,
    }
}
