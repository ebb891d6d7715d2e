use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a `Rect`.
///
/// Props arrive as struct fields; the component is usually rebuilt every
/// frame. `render` takes `&mut self` so stateful components can refresh
/// caches (layout heights, scroll offsets) while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns raw `TuiEvent`s into its own higher-level events.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
