//! # InputBox Component
//!
//! Multi-line text input for composing a message.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste and basic cursor movement
//! - Emit `Submit` on Enter (blank input is swallowed)
//! - Show a language-dependent placeholder when empty
//! - Refuse edits while a send is in flight (`disabled` prop)
//!
//! The buffer and cursor are internal state. `placeholder` and `disabled`
//! are props refreshed from `App` every frame.

mod wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_line_and_column, inner_width, next_boundary,
    prev_boundary, wrapped_lines,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Cursor as a byte offset into `buffer`
    cursor: usize,
    /// First wrapped line shown when the text is taller than the box
    scroll_offset: u16,
    /// Shown dimmed while the buffer is empty (Prop)
    pub placeholder: &'static str,
    /// True while a reply is pending (Prop)
    pub disabled: bool,
}

impl InputBox {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
            placeholder,
            disabled: false,
        }
    }

    /// Height for the current buffer, between 1 and `MAX_VISIBLE_LINES` content rows.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let lines = wrapped_lines(&self.buffer, inner_width(width)).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        Some(InputEvent::ContentChanged)
    }

    /// Keep the cursor's wrapped line inside the visible window.
    fn follow_cursor(&mut self, width: u16) -> (u16, u16) {
        let (line, column) = cursor_line_and_column(&self.buffer, self.cursor, inner_width(width));
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line + 1 - MAX_VISIBLE_LINES;
        }
        (line - self.scroll_offset, column)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, border_style) = if self.disabled {
            (" Waiting for reply... ", Style::default().fg(Color::DarkGray))
        } else {
            (" Message (Enter to send) ", Style::default().fg(Color::Green))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let lines = wrapped_lines(&self.buffer, inner.width);
            let start = usize::from(self.scroll_offset).min(lines.len());
            let end = (start + usize::from(MAX_VISIBLE_LINES)).min(lines.len());
            Paragraph::new(lines[start..end].join("\n")).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(paragraph.block(block), area);

        if !self.disabled {
            let (row, col) = self.follow_cursor(area.width);
            let x = (inner.x + col).min(inner.right().saturating_sub(1));
            frame.set_cursor_position((x, inner.y + row));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(text),
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_boundary(&self.buffer, self.cursor);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Submit if !self.buffer.trim().is_empty() => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll_offset = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
