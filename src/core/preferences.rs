//! # Session Preferences
//!
//! The active display language and the presentation text derived from it.
//! Changes either by explicit toggle (which leaves a notice in the
//! transcript) or silently, when a reply carries a different language hint.

use chrono::Utc;
use log::info;

use crate::core::transcript::Transcript;
use crate::gateway::{Language, MessageEntry};

const SWITCHED_TO_ENGLISH: &str =
    "Language switched to English. I can help you in both English and Swahili! 🇬🇧";
const SWITCHED_TO_SWAHILI: &str =
    "Lugha imebadilishwa kuwa Kiswahili. Naweza kukusaidia kwa Kiingereza na Kiswahili! 🇰🇪";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    active: Language,
}

impl Preferences {
    pub fn new(active: Language) -> Self {
        Self { active }
    }

    pub fn active(&self) -> Language {
        self.active
    }

    /// Flips the language and leaves a bilingual notice in the transcript.
    pub fn toggle(&mut self, transcript: &mut Transcript) {
        self.active = self.active.other();
        info!("Language toggled to {}", self.active.code());
        let notice = match self.active {
            Language::En => SWITCHED_TO_ENGLISH,
            Language::Sw => SWITCHED_TO_SWAHILI,
        };
        transcript.append(MessageEntry::assistant(notice, Utc::now()));
    }

    /// Adopts a language reported by the gateway. Returns true if it changed.
    pub fn sync_from_gateway(&mut self, language: Language) -> bool {
        if language == self.active {
            return false;
        }
        info!(
            "Language synced from gateway: {} -> {}",
            self.active.code(),
            language.code()
        );
        self.active = language;
        true
    }

    /// Input placeholder text.
    pub fn placeholder(&self) -> &'static str {
        match self.active {
            Language::En => "Type your message...",
            Language::Sw => "Andika ujumbe wako...",
        }
    }

    /// Language indicator, active language first.
    pub fn label(&self) -> &'static str {
        match self.active {
            Language::En => "EN/SW",
            Language::Sw => "SW/EN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Sender;

    #[test]
    fn test_default_is_english() {
        let prefs = Preferences::default();
        assert_eq!(prefs.active(), Language::En);
        assert_eq!(prefs.placeholder(), "Type your message...");
        assert_eq!(prefs.label(), "EN/SW");
    }

    #[test]
    fn test_toggle_switches_presentation_text() {
        let mut prefs = Preferences::default();
        let mut transcript = Transcript::new();
        prefs.toggle(&mut transcript);
        assert_eq!(prefs.active(), Language::Sw);
        assert_eq!(prefs.placeholder(), "Andika ujumbe wako...");
        assert_eq!(prefs.label(), "SW/EN");
        assert_eq!(transcript.entries()[0].content, SWITCHED_TO_SWAHILI);
        assert_eq!(transcript.entries()[0].sender, Sender::Assistant);
    }

    #[test]
    fn test_toggle_twice_round_trips_with_two_notices() {
        let mut prefs = Preferences::new(Language::En);
        let mut transcript = Transcript::new();
        prefs.toggle(&mut transcript);
        prefs.toggle(&mut transcript);
        assert_eq!(prefs.active(), Language::En);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[1].content, SWITCHED_TO_ENGLISH);
    }

    #[test]
    fn test_sync_from_gateway_is_silent() {
        let mut prefs = Preferences::default();
        assert!(prefs.sync_from_gateway(Language::Sw));
        assert_eq!(prefs.active(), Language::Sw);
        assert!(!prefs.sync_from_gateway(Language::Sw));
    }
}
