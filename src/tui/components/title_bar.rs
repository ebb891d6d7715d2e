//! # TitleBar Component
//!
//! Single-line header: brand, connection indicator, active language and
//! the transient status message.
//!
//! ```text
//! FashionHub Kenya  ● Online  EN/SW | Ready | 4 msgs · 1m35s | ↓ New
//! ```
//!
//! Stateless: every field is a prop copied from `App` or `TuiState` each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::connection::ConnectionStatus;
use crate::tui::component::Component;

pub struct TitleBar {
    pub brand: String,
    pub connection: ConnectionStatus,
    /// `EN/SW` or `SW/EN`
    pub language_label: &'static str,
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
    /// Conversation stats summary from the last reply
    pub stats: Option<String>,
}

impl TitleBar {
    pub fn new(
        brand: String,
        connection: ConnectionStatus,
        language_label: &'static str,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            brand,
            connection,
            language_label,
            status_message,
            has_unseen_content,
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: Option<String>) -> Self {
        self.stats = stats;
        self
    }

    fn connection_span(&self) -> Span<'static> {
        match self.connection {
            ConnectionStatus::Online => {
                Span::styled("● Online", Style::default().fg(Color::Green))
            }
            ConnectionStatus::Offline => {
                Span::styled("○ Offline", Style::default().fg(Color::Red))
            }
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                self.brand.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            self.connection_span(),
            Span::raw("  "),
            Span::styled(self.language_label, Style::default().fg(Color::Cyan)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if let Some(stats) = &self.stats {
            spans.push(Span::styled(
                format!(" | {stats}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.has_unseen_content {
            spans.push(Span::raw(" | ↓ New"));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
