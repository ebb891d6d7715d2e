//! # Conversation view
//!
//! Draws the transcript top to bottom inside a `ScrollView`, followed by the
//! "AI Assistant is typing" line while a reply is pending. New entries pull
//! the view to the bottom unless the user has scrolled up to read.
//!
//! `MessageListState` outlives frames (scroll offset, height cache, hover);
//! `MessageList` borrows it together with the transcript for one draw.
//!
//! Entries never change once appended, so cached heights stay valid until
//! the width changes or the transcript is replaced by a clear.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::gateway::MessageEntry;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Rows reserved below the last entry for the composing indicator.
const COMPOSING_HEIGHT: u16 = 2;

const TYPING_FRAMES: [&str; 4] = ["●○○", "○●○", "○○●", "○●○"];

/// Scroll position and cached heights. Lives in `TuiState`.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Entry under the mouse, or the last one clicked
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Pull the offset back if content shrank under it.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back down to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Whether there is content below the visible window.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }

    /// Drop cached layout and jump back to the bottom.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// One frame's view of the transcript.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub entries: &'a [MessageEntry],
    pub composing: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        entries: &'a [MessageEntry],
        composing: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            entries,
            composing,
            spinner_frame,
        }
    }

    fn typing_line(&self) -> Line<'static> {
        let dots = TYPING_FRAMES[self.spinner_frame % TYPING_FRAMES.len()];
        Line::from(vec![
            Span::styled(format!(" {dots} "), Style::default().fg(Color::Blue)),
            Span::styled(
                "AI Assistant is typing...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.entries, content_width);
        layout.heights.truncate(reusable);
        for entry in self.entries.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(Message::calculate_height(entry, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.entries, content_width);

        let total_height = self.state.layout.total_height();
        let indicator_height = if self.composing { COMPOSING_HEIGHT } else { 0 };
        let canvas_height = total_height + indicator_height;

        // 2. Clamp scroll offset
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let is_selected = self.state.selected_index == Some(i);
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(&self.entries[i], is_selected), rect);
            y_offset += height;
        }

        if self.composing {
            let rect = Rect::new(0, total_height, content_width, 1);
            scroll_view.render_widget(self.typing_line(), rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Per-entry heights at the last rendered width, plus running totals.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    entry_count: usize,
    content_width: u16,
    /// Timestamp of the first entry; changes when a clear replaces the log.
    first_timestamp: Option<DateTime<Utc>>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            entry_count: 0,
            content_width: 0,
            first_timestamp: None,
        }
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// How many cached heights still describe `entries` at `content_width`.
    pub fn reusable_count(&self, entries: &[MessageEntry], content_width: u16) -> usize {
        if self.content_width != content_width || entries.len() < self.entry_count {
            return 0;
        }
        if entries.first().map(|e| e.timestamp) != self.first_timestamp {
            return 0;
        }
        self.heights.len().min(entries.len())
    }

    pub fn update_metadata(&mut self, entries: &[MessageEntry], content_width: u16) {
        self.entry_count = entries.len();
        self.content_width = content_width;
        self.first_timestamp = entries.first().map(|e| e.timestamp);
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
