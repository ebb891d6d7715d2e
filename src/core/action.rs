//! # Actions
//!
//! Everything that can happen in Duka becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Service replies? That's `Action::ReplyReceived(result)`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state and returns an `Effect` describing the I/O the host
//! should perform next. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! A send cycle looks like this:
//!
//! ```text
//! Submit ─► SendMessage ─► ReplyReceived(Ok) ─► RevealAfter ─► RevealReply
//!                      └─► ReplyReceived(Err) ─► apology, idle
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};

use crate::core::state::{App, Confirmation};
use crate::core::transcript::{WriteError, artifact_filename};
use crate::gateway::{ChatContext, ChatReply, ChatRequest, GatewayError, MessageEntry};

/// Appended whenever a send fails, whatever the reason.
pub const APOLOGY_MESSAGE: &str = "Samahani! Sorry, I'm having trouble connecting right now. Please try again! 😊\n\nTip: Make sure you're connected to the internet.";

pub const CLEAR_FAILED_NOTICE: &str = "Failed to clear conversation. Please try again.";

const DELAY_PER_CHAR: Duration = Duration::from_millis(20);
const MIN_DISPLAY_DELAY: Duration = Duration::from_millis(1000);
const MAX_DISPLAY_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User submitted the input box.
    Submit(String),
    /// User picked quick reply N (zero-based).
    QuickReply(usize),
    /// The gateway call finished.
    ReplyReceived(Result<ChatReply, GatewayError>),
    /// The display delay for a successful reply elapsed.
    RevealReply(ChatReply),
    ToggleLanguage,
    RequestClear,
    ConfirmClear,
    CancelClear,
    /// The remote clear finished.
    ClearFinished(Result<(), GatewayError>),
    Download,
    ExportFinished(Result<PathBuf, WriteError>),
    /// Copy the text of transcript entry N.
    CopyMessage(usize),
    ReachabilityChanged(bool),
    HistoryLoaded(Vec<MessageEntry>),
    DismissNotice,
    Quit,
}

/// Side effects requested by `update()`. The host performs them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SendMessage(ChatRequest),
    RevealAfter { delay: Duration, reply: ChatReply },
    ClearRemote,
    LoadHistory,
    WriteExport { filename: String, contents: String },
    CopyToClipboard(String),
    Quit,
}

/// How long a reply stays hidden behind the composing indicator.
///
/// `min(chars * 20ms + 1000ms, 3000ms)`, counting Unicode scalar values.
pub fn display_delay(reply: &str) -> Duration {
    let chars = u32::try_from(reply.chars().count()).unwrap_or(u32::MAX);
    DELAY_PER_CHAR
        .saturating_mul(chars)
        .saturating_add(MIN_DISPLAY_DELAY)
        .min(MAX_DISPLAY_DELAY)
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(raw) => submit(app, &raw),
        Action::QuickReply(index) => match app.quick_replies.get(index) {
            Some(reply) => {
                let message = reply.message.clone();
                submit(app, &message)
            }
            None => Effect::None,
        },
        Action::ReplyReceived(Ok(reply)) => {
            let delay = display_delay(&reply.response);
            debug!("Reply received, revealing in {}ms", delay.as_millis());
            Effect::RevealAfter { delay, reply }
        }
        Action::ReplyReceived(Err(e)) => {
            warn!("Send failed ({}): {}", e.kind(), e);
            app.composing = false;
            app.transcript
                .append(MessageEntry::assistant(APOLOGY_MESSAGE, chrono::Utc::now()));
            app.send_state.in_flight = false;
            app.status_message = String::from("Connection problem");
            Effect::None
        }
        Action::RevealReply(reply) => {
            if !app.send_state.in_flight {
                debug!("Dropping reply with no send in flight");
                return Effect::None;
            }
            app.composing = false;
            app.transcript
                .append(MessageEntry::assistant(reply.response, reply.timestamp));
            if let Some(language) = reply.language {
                app.preferences.sync_from_gateway(language);
            }
            if reply.stats.is_some() {
                app.stats = reply.stats;
            }
            app.send_state.in_flight = false;
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::ToggleLanguage => {
            app.preferences.toggle(&mut app.transcript);
            app.status_message = format!("Language: {}", app.preferences.label());
            Effect::None
        }
        Action::RequestClear => {
            app.confirm = Some(Confirmation::ClearConversation);
            Effect::None
        }
        Action::ConfirmClear => match app.confirm.take() {
            Some(Confirmation::ClearConversation) => {
                info!("Clearing conversation");
                app.status_message = String::from("Clearing...");
                Effect::ClearRemote
            }
            None => Effect::None,
        },
        Action::CancelClear => {
            app.confirm = None;
            Effect::None
        }
        Action::ClearFinished(Ok(())) => {
            app.transcript.clear();
            app.stats = None;
            app.status_message = String::from("Conversation cleared");
            Effect::None
        }
        Action::ClearFinished(Err(e)) => {
            warn!("Remote clear failed ({}): {}", e.kind(), e);
            app.notice = Some(CLEAR_FAILED_NOTICE.to_string());
            app.status_message = String::from("Ready");
            Effect::None
        }
        Action::Download => match app.transcript.export() {
            Ok(export) => Effect::WriteExport {
                filename: artifact_filename(&app.brand, Local::now().date_naive()),
                contents: export.render(&app.brand),
            },
            Err(e) => {
                app.notice = Some(e.to_string());
                Effect::None
            }
        },
        Action::ExportFinished(Ok(path)) => {
            info!("Conversation exported to {}", path.display());
            app.status_message = format!("Saved {}", path.display());
            Effect::None
        }
        Action::ExportFinished(Err(e)) => {
            warn!("Export failed ({:?}): {}", e.kind, e);
            app.notice = Some(format!("Failed to save conversation: {e}"));
            Effect::None
        }
        Action::CopyMessage(index) => match app.transcript.get(index) {
            Some(entry) => {
                app.status_message = String::from("Copied! ✓");
                Effect::CopyToClipboard(entry.content.clone())
            }
            None => Effect::None,
        },
        Action::ReachabilityChanged(reachable) => {
            if let Some(status) = app.connection.observe(reachable) {
                info!("Connection status: {}", status.label());
            }
            Effect::None
        }
        Action::HistoryLoaded(entries) => {
            let restored = app.transcript.restore(entries);
            if restored > 0 {
                info!("Restored {} messages from history", restored);
                app.status_message = format!("Restored {restored} messages");
            }
            Effect::None
        }
        Action::DismissNotice => {
            app.notice = None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, raw: &str) -> Effect {
    let message = raw.trim();
    if message.is_empty() {
        return Effect::None;
    }
    if app.send_state.in_flight {
        debug!("Submit ignored: send already in flight");
        return Effect::None;
    }

    app.send_state.in_flight = true;
    app.transcript.append(MessageEntry::user(message));
    app.composing = true;
    app.status_message = String::from("Sending...");

    Effect::SendMessage(ChatRequest {
        message: message.to_string(),
        context: ChatContext {
            language: app.preferences.active(),
            history_length: app.transcript.len(),
        },
    })
}
