//! # QuickReplyBar Component
//!
//! One line of function-key hints for the canned messages:
//!
//! ```text
//!  F1 Collections  F2 Sizing  F3 Delivery  F4 M-Pesa  F5 Store
//! ```
//!
//! Dimmed while a send is in flight, since the keys do nothing then.
//! Hints that don't fit the width are dropped from the right.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::config::QuickReply;
use crate::tui::component::Component;

/// Function keys only go up to F9.
pub const MAX_QUICK_REPLIES: usize = 9;

pub struct QuickReplyBar<'a> {
    pub replies: &'a [QuickReply],
    pub disabled: bool,
}

impl<'a> QuickReplyBar<'a> {
    pub fn new(replies: &'a [QuickReply], disabled: bool) -> Self {
        Self { replies, disabled }
    }

    fn line(&self, width: u16) -> Line<'a> {
        let (key_style, label_style) = if self.disabled {
            let dim = Style::default().fg(Color::DarkGray);
            (dim, dim)
        } else {
            (
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Cyan),
            )
        };

        let mut spans = vec![Span::raw(" ")];
        let mut used = 1usize;
        for (i, reply) in self.replies.iter().take(MAX_QUICK_REPLIES).enumerate() {
            let key = format!("F{}", i + 1);
            let cost = key.len() + 1 + reply.label.chars().count() + 2;
            if used + cost > usize::from(width) {
                break;
            }
            used += cost;
            spans.push(Span::styled(key, key_style));
            spans.push(Span::styled(format!(" {}", reply.label), label_style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }
}

impl Component for QuickReplyBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(area.width), area);
    }
}
