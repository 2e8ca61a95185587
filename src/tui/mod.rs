//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Composing** (typing indicator visible): draws every ~80ms for the dot animation.
//! - **Idle**: sleeps up to 500ms, only redraws on events, replies or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.
//!
//! ## Focus
//!
//! Keyboard focus is on the input box or on one quick-reply chip
//! (`TuiState::focus`). Tab and Shift+Tab move between chips, Esc or typing
//! brings focus back to the input.

mod component;
mod components;
mod event;
mod focus;
pub mod reply_timer;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::Conversation;
use crate::tui::component::EventHandler;
use crate::tui::components::message::MessageView;
use crate::tui::components::{InputBox, InputEvent, MessageListState, ReplyTarget};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::reply_timer::ReplyTimer;

const ANIMATION_TICK: Duration = Duration::from_millis(80);
const IDLE_TICK: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Chip with keyboard focus; `None` means the input box has it
    pub focus: Option<ReplyTarget>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            focus: None, // User expects to type immediately
        }
    }

    fn set_focus(&mut self, target: Option<ReplyTarget>) {
        self.focus = target;
        self.input_box.focused = target.is_none();
        if let Some(target) = target {
            self.message_list.scroll_to_target(target);
        }
    }
}

/// What the loop should do after an event has been routed.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Owns everything that reacts to actions: the store, the timer and the
/// channel the timer reports back on.
struct Session {
    convo: Conversation,
    timer: ReplyTimer,
    tx: mpsc::Sender<Action>,
    reply_delay: Duration,
}

impl Session {
    fn dispatch(&mut self, action: Action) -> Flow {
        match update(&mut self.convo, action) {
            Effect::ScheduleReply(pending) => {
                self.timer.schedule(pending, self.reply_delay, self.tx.clone());
                Flow::Continue
            }
            Effect::Quit => Flow::Quit,
            Effect::Replied | Effect::None => Flow::Continue,
        }
    }

    fn shutdown(&mut self) {
        update(&mut self.convo, Action::Quit);
        self.timer.cancel();
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter be told apart from Enter;
        // terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
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
            Hide // Hide cursor on exit
        );
    }
}

/// Run the chat screen until the user quits. Must be called inside a tokio runtime.
pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    // Channel for actions from the reply timer
    let (tx, rx) = mpsc::channel();
    let mut session = Session {
        convo: Conversation::new(config.replies),
        timer: ReplyTimer::new(),
        tx,
        reply_delay: config.reply_delay,
    };
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Could not enable terminal modes: {}", e);
    }
    info!(
        "Chat started: {} messages, reply delay {:?}",
        session.convo.messages().len(),
        session.reply_delay
    );

    let result = event_loop(&mut terminal, &mut session, &mut tui, &rx);

    session.shutdown();
    drop(terminal_mode_guard);
    ratatui::restore();
    info!("Chat closed");
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    session: &mut Session,
    tui: &mut TuiState,
    rx: &mpsc::Receiver<Action>,
) -> std::io::Result<()> {
    // Animation timer
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Sync InputBox props with the store
        tui.input_box.enabled = !session.convo.is_composing();

        let animating = session.convo.is_composing();
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &session.convo, tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating { ANIMATION_TICK } else { IDLE_TICK };
        let first_event = poll_event_timeout(timeout)?;

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        let mut pending_events = Vec::new();
        pending_events.extend(first_event);
        while let Some(event) = poll_event_immediate()? {
            pending_events.push(event);
        }
        for event in pending_events {
            if handle_event(session, tui, event) == Flow::Quit {
                return Ok(());
            }
        }

        // Handle timer actions (deferred replies)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if session.dispatch(action) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

/// Route one terminal event.
fn handle_event(session: &mut Session, tui: &mut TuiState, event: TuiEvent) -> Flow {
    match event {
        // Resize just needs a redraw (already flagged by the caller)
        TuiEvent::Resize => Flow::Continue,

        // Ctrl+C always quits regardless of focus
        TuiEvent::ForceQuit => session.dispatch(Action::Quit),

        TuiEvent::Escape => {
            if tui.focus.is_some() {
                tui.set_focus(None);
                Flow::Continue
            } else {
                session.dispatch(Action::Quit)
            }
        }

        TuiEvent::FocusNext => {
            let next = focus::next(session.convo.messages(), tui.focus);
            tui.set_focus(next);
            Flow::Continue
        }
        TuiEvent::FocusPrev => {
            let prev = focus::prev(session.convo.messages(), tui.focus);
            tui.set_focus(prev);
            Flow::Continue
        }

        // Scroll events always go to MessageList
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            Flow::Continue
        }

        TuiEvent::MouseClick(col, row) => {
            if let Some(target) = tui.message_list.hit_test(col, row) {
                return activate_reply(session, tui, target);
            }
            submit_from_input(session, tui, &event)
        }

        TuiEvent::Submit => match tui.focus {
            Some(target) => activate_reply(session, tui, target),
            None => submit_from_input(session, tui, &event),
        },

        // Anything else is editing: focus returns to the input
        _ => {
            if tui.focus.is_some() {
                tui.set_focus(None);
            }
            submit_from_input(session, tui, &event)
        }
    }
}

/// Let the InputBox handle `event`; forward a submission to the store.
fn submit_from_input(session: &mut Session, tui: &mut TuiState, event: &TuiEvent) -> Flow {
    // Events are handled in batches, so an earlier event in this batch may
    // have started a turn since the loop last synced this prop
    tui.input_box.enabled = !session.convo.is_composing();
    match tui.input_box.handle_event(event) {
        Some(InputEvent::Submit(text)) => session.dispatch(Action::Submit(text)),
        Some(InputEvent::ContentChanged) | None => Flow::Continue,
    }
}

fn activate_reply(session: &mut Session, tui: &mut TuiState, target: ReplyTarget) -> Flow {
    if session.convo.is_composing() {
        debug!("Ignoring quick reply {:?} while composing", target);
        return Flow::Continue;
    }
    let mut chosen = None;
    let on_quick_reply = |reply: &str| chosen = Some(reply.to_string());
    // Use the view that was drawn; before the first frame nothing is cached
    match tui.message_list.layout.entries.get(target.message_index) {
        Some(entry) => entry.view.activate(target.reply_index, on_quick_reply),
        None => match session.convo.messages().get(target.message_index) {
            Some(message) => MessageView::build(message).activate(target.reply_index, on_quick_reply),
            None => false,
        },
    };
    let Some(reply) = chosen else {
        debug!("No quick reply at {:?}", target);
        return Flow::Continue;
    };
    tui.set_focus(None);
    session.dispatch(Action::SelectQuickReply(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Author;
    use crate::core::script::CannedReplies;

    fn session() -> (Session, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        let session = Session {
            convo: Conversation::new(CannedReplies::default()),
            timer: ReplyTimer::new(),
            tx,
            reply_delay: Duration::from_millis(10),
        };
        (session, rx)
    }

    fn type_text(session: &mut Session, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            handle_event(session, tui, TuiEvent::InputChar(c));
        }
    }

    #[tokio::test]
    async fn test_enter_submits_typed_text_and_schedules_reply() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        type_text(&mut session, &mut tui, "I need a cover letter");

        assert_eq!(handle_event(&mut session, &mut tui, TuiEvent::Submit), Flow::Continue);
        let last = session.convo.last_message().unwrap();
        assert_eq!(last.author, Author::User);
        assert_eq!(last.content, "I need a cover letter");
        assert!(session.convo.is_composing());
        assert!(session.timer.is_scheduled());
        assert!(tui.input_box.buffer.is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_enter_is_ignored() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        type_text(&mut session, &mut tui, "   ");
        handle_event(&mut session, &mut tui, TuiEvent::Submit);
        assert_eq!(session.convo.messages().len(), 3);
        assert!(!session.convo.is_composing());
        assert!(!session.timer.is_scheduled());
    }

    #[tokio::test]
    async fn test_tab_then_enter_selects_quick_reply() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        handle_event(&mut session, &mut tui, TuiEvent::FocusNext);
        assert!(!tui.input_box.focused);
        handle_event(&mut session, &mut tui, TuiEvent::FocusNext);
        handle_event(&mut session, &mut tui, TuiEvent::Submit);

        let last = session.convo.last_message().unwrap();
        assert_eq!(last.content, "Work Experience");
        assert!(session.convo.is_composing());
        assert_eq!(tui.focus, None);
        assert!(tui.input_box.focused);
    }

    #[tokio::test]
    async fn test_quick_reply_ignored_while_composing() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        type_text(&mut session, &mut tui, "hello");
        handle_event(&mut session, &mut tui, TuiEvent::Submit);
        let count = session.convo.messages().len();

        handle_event(&mut session, &mut tui, TuiEvent::FocusNext);
        handle_event(&mut session, &mut tui, TuiEvent::Submit);
        assert_eq!(session.convo.messages().len(), count);
    }

    #[tokio::test]
    async fn test_enter_while_composing_keeps_draft() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        type_text(&mut session, &mut tui, "hi");
        handle_event(&mut session, &mut tui, TuiEvent::Submit);
        // Same batch: the loop has not re-synced the input box yet
        type_text(&mut session, &mut tui, "again");
        handle_event(&mut session, &mut tui, TuiEvent::Submit);

        assert_eq!(tui.input_box.buffer, "again");
        assert!(!tui.input_box.enabled);
        assert_eq!(session.convo.messages().len(), 4);
        assert_eq!(session.convo.last_message().unwrap().content, "hi");
    }

    #[tokio::test]
    async fn test_clicked_chip_sends_its_label() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        // Lay the transcript out so chips have screen positions
        let backend = ratatui::backend::TestBackend::new(80, 40);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|f| ui::draw_ui(f, &session.convo, &mut tui, 0))
            .unwrap();

        let target = ReplyTarget {
            message_index: 0,
            reply_index: 1,
        };
        let chip = tui.message_list.layout.chip_rect(target).unwrap();
        let offset = tui.message_list.scroll_state.offset().y;
        let row = tui.message_list.viewport.y + chip.y - offset;
        handle_event(&mut session, &mut tui, TuiEvent::MouseClick(chip.x + 1, row));

        assert_eq!(session.convo.last_message().unwrap().content, "Practice Interview");
        assert!(session.convo.is_composing());
    }

    #[tokio::test]
    async fn test_escape_returns_focus_then_quits() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        handle_event(&mut session, &mut tui, TuiEvent::FocusPrev);
        assert!(tui.focus.is_some());

        assert_eq!(handle_event(&mut session, &mut tui, TuiEvent::Escape), Flow::Continue);
        assert_eq!(tui.focus, None);
        assert_eq!(handle_event(&mut session, &mut tui, TuiEvent::Escape), Flow::Quit);
        assert!(!session.convo.is_live());
    }

    #[tokio::test]
    async fn test_typing_moves_focus_back_to_input() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        handle_event(&mut session, &mut tui, TuiEvent::FocusNext);
        handle_event(&mut session, &mut tui, TuiEvent::InputChar('x'));
        assert_eq!(tui.focus, None);
        assert_eq!(tui.input_box.buffer, "x");
    }

    #[tokio::test]
    async fn test_force_quit_cancels_pending_reply() {
        let (mut session, _rx) = session();
        let mut tui = TuiState::new();
        type_text(&mut session, &mut tui, "hello");
        handle_event(&mut session, &mut tui, TuiEvent::Submit);

        assert_eq!(handle_event(&mut session, &mut tui, TuiEvent::ForceQuit), Flow::Quit);
        session.shutdown();
        assert!(!session.timer.is_scheduled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_through_channel() {
        let (mut session, rx) = session();
        let mut tui = TuiState::new();
        type_text(&mut session, &mut tui, "hello");
        handle_event(&mut session, &mut tui, TuiEvent::Submit);

        tokio::time::sleep(Duration::from_millis(20)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let action = rx.try_recv().unwrap();
        session.dispatch(action);
        assert!(!session.convo.is_composing());
        assert_eq!(session.convo.last_message().unwrap().author, Author::Assistant);
    }
}
