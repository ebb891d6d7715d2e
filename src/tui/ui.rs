use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Dialog, MessageList, QuickReplyBar, TitleBar};

/// Splits the screen into title, messages, quick replies and input.
///
/// ```text
/// ┌──────────────────────────────┐
/// │ title (1)                    │
/// ├──────────────────────────────┤
/// │ messages (rest)              │
/// ├──────────────────────────────┤
/// │ quick replies (1)            │
/// ├──────────────────────────────┤
/// │ input (3..7)                 │
/// └──────────────────────────────┘
/// ```
fn screen_areas(area: Rect, input_height: u16) -> [Rect; 4] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(1), Length(input_height)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    tui.sync_props(app);

    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, main_area, quick_area, input_area] = screen_areas(frame.area(), input_height);

    MessageList::new(
        &mut tui.message_list,
        app.transcript.entries(),
        app.composing,
        spinner_frame,
    )
    .render(frame, main_area);

    TitleBar::new(
        app.brand.clone(),
        app.connection.status(),
        app.preferences.label(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    )
    .with_stats(app.stats.as_ref().map(|s| s.summary()))
    .render(frame, title_area);

    QuickReplyBar::new(&app.quick_replies, app.is_sending()).render(frame, quick_area);
    tui.input_box.render(frame, input_area);

    // Modal overlays: a pending question wins over a notice
    let full = frame.area();
    if let Some(confirm) = app.confirm {
        Dialog::confirm(confirm.prompt()).render(frame, full);
    } else if let Some(notice) = &app.notice {
        Dialog::notice(notice).render(frame, full);
    }
}

/// Hit test: given a screen Y coordinate, find which transcript entry (if any) is there.
pub fn hit_test_message(
    screen_y: u16,
    frame_area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
    input_height: u16,
) -> Option<usize> {
    let [_, main_area, _, _] = screen_areas(frame_area, input_height);

    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }

    let content_y = (screen_y - main_area.y).saturating_add(scroll_offset_y);
    let index = prefix_heights.partition_point(|&end| end <= content_y);
    (index < prefix_heights.len()).then_some(index)
}
