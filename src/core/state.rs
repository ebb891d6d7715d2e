//! # Application State
//!
//! Core business state for Duka. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── transcript: Transcript          // every message, in order
//! ├── preferences: Preferences        // active language
//! ├── send_state: SendState           // at most one request in flight
//! ├── composing: bool                 // "assistant is typing" indicator
//! ├── connection: ConnectionMonitor   // reachability indicator
//! ├── status_message: String          // status bar text
//! ├── notice: Option<String>          // modal notice (errors, empty export)
//! ├── confirm: Option<Confirmation>   // pending yes/no question
//! ├── quick_replies: Vec<QuickReply>  // canned messages on F1..F9
//! ├── brand: String                   // title + export header
//! ├── export_dir: PathBuf             // where downloads land
//! └── stats: Option<ConversationStats> // last stats the service reported
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::path::PathBuf;

use crate::core::config::{QuickReply, ResolvedConfig};
use crate::core::connection::ConnectionMonitor;
use crate::core::preferences::Preferences;
use crate::core::transcript::Transcript;
use crate::gateway::{ConversationStats, Language};

/// Tracks the single outstanding chat request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendState {
    pub in_flight: bool,
}

/// Questions that need a yes/no before anything happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    ClearConversation,
}

impl Confirmation {
    pub fn prompt(self) -> &'static str {
        match self {
            Confirmation::ClearConversation => {
                "Are you sure you want to clear the conversation? (y/n)"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct App {
    pub transcript: Transcript,
    pub preferences: Preferences,
    pub send_state: SendState,
    pub composing: bool,
    pub connection: ConnectionMonitor,
    pub status_message: String,
    pub notice: Option<String>,
    pub confirm: Option<Confirmation>,
    pub quick_replies: Vec<QuickReply>,
    pub brand: String,
    pub export_dir: PathBuf,
    /// Latest conversation stats reported by the service, if any.
    pub stats: Option<ConversationStats>,
}

impl App {
    pub fn new(language: Language, brand: impl Into<String>) -> Self {
        Self {
            transcript: Transcript::new(),
            preferences: Preferences::new(language),
            send_state: SendState::default(),
            composing: false,
            connection: ConnectionMonitor::default(),
            status_message: String::from("Karibu! Welcome!"),
            notice: None,
            confirm: None,
            quick_replies: Vec::new(),
            brand: brand.into(),
            export_dir: PathBuf::from("."),
            stats: None,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            quick_replies: config.quick_replies.clone(),
            export_dir: config.export_dir.clone(),
            ..Self::new(config.language, config.brand.clone())
        }
    }

    pub fn is_sending(&self) -> bool {
        self.send_state.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, DukaConfig, resolve};
    use crate::core::connection::ConnectionStatus;

    #[test]
    fn test_app_new_defaults() {
        let app = App::new(Language::En, "FashionHub Kenya");
        assert!(app.transcript.is_empty());
        assert!(!app.is_sending());
        assert!(!app.composing);
        assert_eq!(app.connection.status(), ConnectionStatus::Online);
        assert!(app.notice.is_none());
        assert!(app.confirm.is_none());
    }

    #[test]
    fn test_from_config_carries_quick_replies_and_language() {
        let mut config = resolve(&DukaConfig::default(), &CliOverrides::default());
        config.language = Language::Sw;
        config.brand = "Soko".to_string();
        let app = App::from_config(&config);
        assert_eq!(app.preferences.active(), Language::Sw);
        assert_eq!(app.brand, "Soko");
        assert_eq!(app.quick_replies, config.quick_replies);
    }
}
