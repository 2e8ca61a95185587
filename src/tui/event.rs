use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Core actions (lead to core::update)
    ForceQuit, // Ctrl+C
    Submit,    // Enter without modifiers

    // TUI-local events (handled directly in TUI)
    /// Enter with Shift/Alt/Ctrl. Never submits; the field is single-line.
    ModifiedEnter,
    Escape,
    InputChar(char),
    Paste(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    FocusNext, // Tab
    FocusPrev, // Shift+Tab
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    MouseClick(u16, u16),
    Resize,
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(map_event(event::read()?))
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

fn map_event(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => map_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
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

/// Translate a key press. Releases are dropped (keyboard enhancement reports them).
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    let modifiers = key_event.modifiers;
    match key_event.code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TuiEvent::ForceQuit)
        }
        KeyCode::Enter if modifiers.is_empty() => Some(TuiEvent::Submit),
        KeyCode::Enter => Some(TuiEvent::ModifiedEnter),
        KeyCode::Char(_)
            if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            None
        }
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Tab => Some(TuiEvent::FocusNext),
        KeyCode::BackTab => Some(TuiEvent::FocusPrev),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::Up => Some(TuiEvent::ScrollUp),
        KeyCode::Down => Some(TuiEvent::ScrollDown),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}
