use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Core actions (translated to core::Action by the event loop)
    Quit,
    Submit,
    QuickReply(usize), // F1..F9, zero-based
    ToggleLanguage,    // Ctrl+T
    ClearConversation, // Ctrl+L
    Download,          // Ctrl+D

    // TUI-local events (handled directly in TUI)
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    Escape,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    MouseMove(u16, u16),
    MouseClick(u16, u16),
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`. Read errors count as "no event".
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read() {
        Ok(ev) => map_event(ev),
        Err(e) => {
            log::warn!("Failed to read terminal event: {}", e);
            None
        }
    }
}

/// Translate a raw crossterm event into a `TuiEvent`.
pub fn map_event(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved => Some(TuiEvent::MouseMove(mouse.column, mouse.row)),
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse.column, mouse.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<TuiEvent> {
    // Keyboard enhancement reports releases too; only presses count
    if key.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c' | 'q') if ctrl => Some(TuiEvent::Quit),
        KeyCode::Char('t') if ctrl => Some(TuiEvent::ToggleLanguage),
        KeyCode::Char('l') if ctrl => Some(TuiEvent::ClearConversation),
        KeyCode::Char('d') if ctrl => Some(TuiEvent::Download),
        // Ctrl+J inserts newline (ASCII LF)
        KeyCode::Char('j') if ctrl => Some(TuiEvent::InputChar('\n')),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Enter if shift => Some(TuiEvent::InputChar('\n')),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::F(n @ 1..=9) => Some(TuiEvent::QuickReply(usize::from(n) - 1)),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Up => Some(TuiEvent::ScrollUp),
        KeyCode::Down => Some(TuiEvent::ScrollDown),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_submit_and_newline() {
        assert_eq!(
            map_event(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(TuiEvent::Submit)
        );
        assert_eq!(
            map_event(key(KeyCode::Enter, KeyModifiers::CONTROL)),
            Some(TuiEvent::Submit)
        );
        assert_eq!(
            map_event(key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('\n'))
        );
        assert_eq!(
            map_event(key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(TuiEvent::InputChar('\n'))
        );
    }

    #[test]
    fn test_control_shortcuts() {
        let ctrl = |c| map_event(key(KeyCode::Char(c), KeyModifiers::CONTROL));
        assert_eq!(ctrl('c'), Some(TuiEvent::Quit));
        assert_eq!(ctrl('q'), Some(TuiEvent::Quit));
        assert_eq!(ctrl('t'), Some(TuiEvent::ToggleLanguage));
        assert_eq!(ctrl('l'), Some(TuiEvent::ClearConversation));
        assert_eq!(ctrl('d'), Some(TuiEvent::Download));
        assert_eq!(ctrl('x'), None);
    }

    #[test]
    fn test_function_keys_map_to_quick_replies() {
        assert_eq!(
            map_event(key(KeyCode::F(1), KeyModifiers::NONE)),
            Some(TuiEvent::QuickReply(0))
        );
        assert_eq!(
            map_event(key(KeyCode::F(9), KeyModifiers::NONE)),
            Some(TuiEvent::QuickReply(8))
        );
        assert_eq!(map_event(key(KeyCode::F(10), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_event(Event::Key(release)), None);
    }

    #[test]
    fn test_mouse_events() {
        let mouse = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 4,
                row: 7,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(
            map_event(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(TuiEvent::MouseClick(4, 7))
        );
        assert_eq!(
            map_event(mouse(MouseEventKind::Moved)),
            Some(TuiEvent::MouseMove(4, 7))
        );
        assert_eq!(
            map_event(mouse(MouseEventKind::ScrollDown)),
            Some(TuiEvent::ScrollDown)
        );
        assert_eq!(map_event(mouse(MouseEventKind::Down(MouseButton::Right))), None);
    }

    #[test]
    fn test_plain_chars_and_paste() {
        assert_eq!(
            map_event(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('A'))
        );
        assert_eq!(
            map_event(Event::Paste("a\nb".to_string())),
            Some(TuiEvent::Paste("a\nb".to_string()))
        );
    }
}
