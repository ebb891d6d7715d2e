//! # Transcript
//!
//! The ordered log of every message in the session. Entries are only ever
//! appended; the one way to shrink the log is `clear()`, which swaps it for
//! a single greeting.
//!
//! Insertion order is display order is export order.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use log::debug;

use crate::gateway::{MessageEntry, Sender};

/// Greeting that replaces the log after a clear.
pub const WELCOME_MESSAGE: &str = "Conversation cleared! How can I help you today? / Mazungumzo yamefutwa! Ninawezaje kukusaidia leo?";

/// Underline written below the export header.
const EXPORT_SEPARATOR: &str = "=====================================";

/// Timestamp format for exported entries (`5/1/2024, 2:05:09 PM`).
const EXPORT_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    entries: Vec<MessageEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MessageEntry> {
        self.entries.get(index)
    }

    /// Appends an entry at the end. Never fails.
    pub fn append(&mut self, entry: MessageEntry) {
        debug!(
            "Transcript append #{}: {:?}, {} chars",
            self.entries.len(),
            entry.sender,
            entry.content.chars().count()
        );
        self.entries.push(entry);
    }

    /// Replaces the whole log with the welcome greeting.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.entries
            .push(MessageEntry::assistant(WELCOME_MESSAGE, Utc::now()));
    }

    /// Seeds an empty transcript from server history. Returns how many entries were added.
    pub fn restore(&mut self, entries: Vec<MessageEntry>) -> usize {
        if !self.entries.is_empty() {
            return 0;
        }
        let count = entries.len();
        self.entries = entries;
        count
    }

    /// Prepares an export. An empty transcript has nothing to export.
    pub fn export(&self) -> Result<Export<'_>, ExportError> {
        if self.entries.is_empty() {
            return Err(ExportError::Empty);
        }
        Ok(Export {
            entries: &self.entries,
        })
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Nothing has been said yet.
    Empty,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Empty => write!(f, "No conversation to download!"),
        }
    }
}

impl std::error::Error for ExportError {}

/// A failed artifact write. Keeps the I/O error kind so it survives the
/// trip through the action channel (`io::Error` is not `Clone`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
    pub kind: io::ErrorKind,
    pub message: String,
}

impl From<io::Error> for WriteError {
    fn from(e: io::Error) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WriteError {}

/// One exported entry: when, who, what.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLine<'a> {
    pub timestamp: DateTime<Utc>,
    pub speaker: &'static str,
    pub content: &'a str,
}

impl fmt::Display for ExportLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.timestamp.with_timezone(&Local).format(EXPORT_TIME_FORMAT);
        write!(f, "[{}] {}:\n{}\n\n", time, self.speaker, self.content)
    }
}

/// A borrowed view over a non-empty transcript.
///
/// `lines()` can be called any number of times; each call walks the
/// entries again from the start.
#[derive(Debug, Clone, Copy)]
pub struct Export<'a> {
    entries: &'a [MessageEntry],
}

impl<'a> Export<'a> {
    pub fn lines(&self) -> impl Iterator<Item = ExportLine<'a>> + 'a {
        self.entries.iter().map(|entry| ExportLine {
            timestamp: entry.timestamp,
            speaker: entry.sender.export_name(),
            content: &entry.content,
        })
    }

    /// Builds the plain-text artifact: header, separator, then one block per entry.
    pub fn render(&self, brand: &str) -> String {
        let mut text = format!("{brand} - Conversation History\n{EXPORT_SEPARATOR}\n\n");
        for line in self.lines() {
            text.push_str(&line.to_string());
        }
        text
    }
}

/// `FashionHub-Conversation-2024-05-01.txt`
pub fn artifact_filename(brand: &str, date: NaiveDate) -> String {
    let prefix = brand.split_whitespace().next().unwrap_or("Chat");
    format!("{}-Conversation-{}.txt", prefix, date.format("%Y-%m-%d"))
}

/// Writes the artifact into `dir` via `.tmp` + rename and returns the final path.
pub fn write_artifact(dir: &Path, filename: &str, contents: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, &path)?;
    Ok(path)
}
