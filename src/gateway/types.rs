use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Display language of the session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sw,
}

impl Language {
    /// Wire code ("en" / "sw").
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Sw => "sw",
        }
    }

    pub fn other(self) -> Language {
        match self {
            Language::En => Language::Sw,
            Language::Sw => Language::En,
        }
    }

    /// Parses a language hint. Anything other than en/sw is not a language we display.
    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "sw" => Some(Language::Sw),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant", alias = "bot")]
    Assistant,
}

impl Sender {
    /// Name shown next to a message in the thread.
    pub fn display_name(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "AI Assistant",
        }
    }

    /// Name used in exported transcripts.
    pub fn export_name(self) -> &'static str {
        match self {
            Sender::User => "Customer",
            Sender::Assistant => "AI Assistant",
        }
    }
}

/// One message in the conversation. Immutable once appended to a transcript.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageEntry {
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl MessageEntry {
    /// A user entry stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Assistant,
            timestamp,
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// Context sent alongside every chat message.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatContext {
    pub language: Language,
    pub history_length: usize,
}

/// Body of `POST /api/chat`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub context: ChatContext,
}

/// Running totals the service reports with each reply.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConversationStats {
    #[serde(default)]
    pub total_messages: u32,
    #[serde(default)]
    pub user_messages: u32,
    #[serde(default)]
    pub bot_messages: u32,
    /// Seconds since the first message of the conversation.
    #[serde(default)]
    pub duration: u64,
}

impl ConversationStats {
    /// Short form for the status line, e.g. `4 msgs · 1m35s`.
    pub fn summary(&self) -> String {
        format!(
            "{} msgs · {}m{:02}s",
            self.total_messages,
            self.duration / 60,
            self.duration % 60
        )
    }
}

/// A successful reply from the chat service, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub language: Option<Language>,
    pub stats: Option<ConversationStats>,
}

/// Raw reply payload. `response` is optional here so a missing field can be
/// reported as a protocol error instead of a generic decode failure.
#[derive(Deserialize, Debug)]
pub(crate) struct RawChatReply {
    pub response: Option<String>,
    pub timestamp: Option<String>,
    pub language: Option<String>,
    pub conversation_stats: Option<serde_json::Value>,
}

/// One record of `GET /api/conversation/history`.
#[derive(Deserialize, Debug)]
pub(crate) struct HistoryRecord {
    pub content: String,
    pub sender: Sender,
    pub timestamp: Option<String>,
}

impl HistoryRecord {
    pub fn into_entry(self) -> MessageEntry {
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);
        MessageEntry {
            content: self.content,
            sender: self.sender,
            timestamp,
        }
    }
}

/// Parses a service timestamp.
///
/// RFC 3339 strings carry their own offset. Naive ISO-8601 strings (no offset)
/// are taken to be local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
