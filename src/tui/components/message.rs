use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::gateway::{MessageEntry, Sender};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Renders one transcript entry as a bordered bubble titled
/// `{sender} • {local time}`.
///
/// Customer messages are green with the title on the right; assistant
/// messages are blue with the title on the left. The selected entry (mouse
/// hover or the last click) gets a cyan border.
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered
/// height with `textwrap` so `MessageList` can lay out its scroll canvas
/// without rendering first. The wrap options match ratatui's `Paragraph`.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub entry: &'a MessageEntry,
    pub is_selected: bool,
}

impl<'a> Message<'a> {
    pub fn new(entry: &'a MessageEntry, is_selected: bool) -> Self {
        Self { entry, is_selected }
    }

    pub fn calculate_height(entry: &MessageEntry, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = entry.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> String {
        let time = self.entry.timestamp.with_timezone(&Local).format("%H:%M");
        format!(" {} • {} ", self.entry.sender.display_name(), time)
    }
}

fn sender_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::Green),
        Sender::Assistant => Style::default().fg(Color::Blue),
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = sender_style(self.entry.sender);
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };
        let title_alignment = match self.entry.sender {
            Sender::User => Alignment::Right,
            Sender::Assistant => Alignment::Left,
        };

        let block = Block::bordered()
            .title(self.title())
            .title_alignment(title_alignment)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.entry.content.trim())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl Component for Message<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
