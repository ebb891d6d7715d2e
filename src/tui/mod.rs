//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Composing** (reply pending): draws every ~120ms so the typing dots move.
//! - **Idle**: sleeps up to 500ms and only redraws on events, background
//!   actions or terminal resize.
//!
//! ## Host-side effects
//!
//! Most effects go to the [`Dispatcher`]. The two that touch the terminal or
//! the local disk are done here: `WriteExport` writes the transcript file,
//! `CopyToClipboard` emits an OSC 52 sequence.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::clipboard::CopyToClipboard;
use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::transcript::{WriteError, write_artifact};
use crate::dispatch::{Dispatcher, spawn_reachability_probe};
use crate::gateway::{ChatGateway, HttpGateway};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Two clicks on the same entry within this window count as a double click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    clicks: ClickTracker,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(app.preferences.placeholder()),
            clicks: ClickTracker::default(),
        }
    }

    /// Copies the props the input box derives from `App`: placeholder
    /// language and the in-flight gate.
    pub fn sync_props(&mut self, app: &App) {
        self.input_box.placeholder = app.preferences.placeholder();
        self.input_box.disabled = app.is_sending();
    }
}

/// Detects double clicks on transcript entries.
#[derive(Default)]
struct ClickTracker {
    last: Option<(Instant, usize)>,
}

impl ClickTracker {
    /// Records a click on `index`. Returns true if it completes a double click.
    fn click(&mut self, index: usize, now: Instant) -> bool {
        let double = matches!(
            self.last,
            Some((at, prev)) if prev == index && now.duration_since(at) <= DOUBLE_CLICK_WINDOW
        );
        self.last = if double { None } else { Some((now, index)) };
        double
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter.
        // Terminals that don't support it ignore the sequence.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn build_gateway(config: &ResolvedConfig) -> std::io::Result<Arc<dyn ChatGateway>> {
    let gateway = HttpGateway::new(config.base_url.clone(), config.request_timeout)
        .map_err(std::io::Error::other)?;
    info!(
        "Chat gateway: {} (timeout {}s)",
        gateway.base_url(),
        config.request_timeout.as_secs()
    );
    Ok(Arc::new(gateway))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let gateway = build_gateway(&config)?;
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(&app);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let dispatcher = Dispatcher::new(gateway, tx.clone());
    let probe = spawn_reachability_probe(&config.base_url, config.probe_interval, tx);
    if config.restore_history {
        dispatcher.dispatch(Effect::LoadHistory);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true;
    let mut last_len = app.transcript.len();

    'main: loop {
        if app.composing {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_millis() / 120) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if app.composing {
            Duration::from_millis(120)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::MouseMove(_, row) if app.confirm.is_none() && app.notice.is_none() => {
                    tui.message_list.selected_index = hit_test(&mut terminal, &tui, row);
                    None
                }
                TuiEvent::MouseClick(_, row) if app.confirm.is_none() && app.notice.is_none() => {
                    hit_test(&mut terminal, &tui, row).and_then(|idx| {
                        tui.message_list.selected_index = Some(idx);
                        tui.clicks
                            .click(idx, Instant::now())
                            .then_some(Action::CopyMessage(idx))
                    })
                }
                other => route_event(&app, &mut tui, &other),
            };

            if let Some(action) = action
                && apply(&mut app, &dispatcher, action)
            {
                break 'main;
            }
            // Later events in this batch must see the gate the action just set
            tui.sync_props(&app);
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if apply(&mut app, &dispatcher, action) {
                break 'main;
            }
        }
        tui.sync_props(&app);

        // Transcript shrank or was replaced: cached layout no longer applies
        if app.transcript.len() < last_len {
            tui.message_list.reset();
        }
        last_len = app.transcript.len();
    }

    if let Some(handle) = probe {
        handle.abort();
    }
    ratatui::restore();
    info!("Duka shutting down");
    Ok(())
}

/// Maps a non-mouse event to an action. Keys for the input box are handled
/// in place and only surface as `Submit`.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Resize | TuiEvent::MouseMove(..) | TuiEvent::MouseClick(..) => None,
        TuiEvent::Quit => Some(Action::Quit),
        // Modal: a pending question takes every key
        _ if app.confirm.is_some() => match event {
            TuiEvent::InputChar('y' | 'Y') | TuiEvent::Submit => Some(Action::ConfirmClear),
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => Some(Action::CancelClear),
            _ => None,
        },
        _ if app.notice.is_some() => match event {
            TuiEvent::Submit | TuiEvent::Escape | TuiEvent::InputChar(_) => {
                Some(Action::DismissNotice)
            }
            _ => None,
        },
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            None
        }
        TuiEvent::QuickReply(index) => Some(Action::QuickReply(*index)),
        TuiEvent::ToggleLanguage => Some(Action::ToggleLanguage),
        TuiEvent::ClearConversation => Some(Action::RequestClear),
        TuiEvent::Download => Some(Action::Download),
        _ => match tui.input_box.handle_event(event) {
            Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
            Some(InputEvent::ContentChanged) | None => None,
        },
    }
}

/// Runs the reducer and carries out the resulting effect. Returns true to quit.
fn apply(app: &mut App, dispatcher: &Dispatcher, action: Action) -> bool {
    match dispatcher.dispatch(update(app, action)) {
        Effect::Quit => true,
        Effect::WriteExport { filename, contents } => {
            let result =
                write_artifact(&app.export_dir, &filename, &contents).map_err(WriteError::from);
            apply(app, dispatcher, Action::ExportFinished(result))
        }
        Effect::CopyToClipboard(text) => {
            if let Err(e) = execute!(stdout(), CopyToClipboard::to_clipboard_from(text)) {
                warn!("Clipboard copy failed: {}", e);
                app.status_message = String::from("Copy failed");
            }
            false
        }
        _ => false,
    }
}

fn hit_test(terminal: &mut ratatui::DefaultTerminal, tui: &TuiState, row: u16) -> Option<usize> {
    let frame_area = terminal.get_frame().area();
    ui::hit_test_message(
        row,
        frame_area,
        tui.message_list.scroll_state.offset().y,
        &tui.message_list.layout.prefix_heights,
        tui.input_box.calculate_height(frame_area.width),
    )
}
