//! # Dialog Component
//!
//! Centered modal box drawn over the conversation. Used for the clear
//! confirmation and for notices (failed clear, empty download, write errors).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::Component;

const DIALOG_WIDTH: u16 = 56;

pub struct Dialog<'a> {
    pub title: &'a str,
    pub body: &'a str,
    /// Key hint shown under the body, e.g. `y / n`
    pub hint: &'a str,
    pub accent: Color,
}

impl<'a> Dialog<'a> {
    pub fn confirm(body: &'a str) -> Self {
        Self {
            title: " Confirm ",
            body,
            hint: "[y] yes   [n] no",
            accent: Color::Yellow,
        }
    }

    pub fn notice(body: &'a str) -> Self {
        Self {
            title: " Notice ",
            body,
            hint: "[Enter] dismiss",
            accent: Color::Red,
        }
    }

    /// Centered rect sized to fit the wrapped body plus hint.
    fn area(&self, outer: Rect) -> Rect {
        let width = DIALOG_WIDTH.min(outer.width);
        // borders (2) + padding (2)
        let text_width = usize::from(width.saturating_sub(4)).max(1);
        let body_lines = textwrap::wrap(self.body, text_width).len() as u16;
        // body + blank + hint + borders
        let height = (body_lines + 4).min(outer.height);

        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(outer);
        let [area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(row);
        area
    }
}

impl Component for Dialog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let popup = self.area(area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.accent))
            .title(self.title)
            .padding(Padding::horizontal(1));

        let text = format!("{}\n\n{}", self.body, self.hint);
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}
