//! # InputBox Component
//!
//! Single-line text field plus a send button.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter or a click on the send button, same path)
//! - Show a placeholder when empty and disable the send button when the
//!   trimmed text is empty or submissions are blocked
//!
//! ## State Management
//!
//! The buffer is internal state. `enabled` and `focused` are props from the
//! parent. Cursor position and horizontal scroll live in `CursorState`.

mod cursor;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, next_char_boundary, prev_char_boundary};

/// Rows the input bar occupies.
pub const HEIGHT: u16 = 3;
/// Border (2) + padding (2) consumed horizontally by the field block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Offset from the field edge to the first text column (border + padding)
const TEXT_OFFSET: u16 = 2;
const SEND_BUTTON_WIDTH: u16 = 10;
const PLACEHOLDER: &str = "Type your answer…";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter or send button)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

/// Text input component with a send button.
///
/// # Props
///
/// - `enabled`: false while submissions are blocked (a reply is pending)
/// - `focused`: false while keyboard focus is on a quick reply
///
/// # State
///
/// - `buffer`: Current text being typed
/// - `cursor`: Cursor position and horizontal scroll (see `CursorState`)
/// - `send_button`: Where the button was last drawn, for click testing
pub struct InputBox {
    pub buffer: String,
    pub enabled: bool,
    pub focused: bool,
    cursor: CursorState,
    send_button: Rect,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            enabled: true,
            focused: true,
            cursor: CursorState::new(),
            send_button: Rect::default(),
        }
    }

    /// Whether the send button is active.
    pub fn can_submit(&self) -> bool {
        self.enabled && !self.buffer.trim().is_empty()
    }

    /// Take the buffer as a submission, if allowed. Enter and the send
    /// button both come through here.
    pub fn submit(&mut self) -> Option<InputEvent> {
        if !self.can_submit() {
            return None;
        }
        let text = std::mem::take(&mut self.buffer);
        self.cursor.reset();
        Some(InputEvent::Submit(text))
    }

    /// Whether a screen position falls on the send button.
    pub fn hits_send_button(&self, col: u16, row: u16) -> bool {
        self.send_button.contains(Position { x: col, y: row })
    }

    fn insert_str(&mut self, text: &str) {
        // Single-line field: line breaks from a paste become spaces
        let flat: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.buffer.insert_str(self.cursor.pos, &flat);
        self.cursor.pos += flat.len();
    }

    fn render_field(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1));

        let visible = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        self.cursor.update_scroll(&self.buffer, visible);

        let content = if self.buffer.is_empty() {
            Line::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Line::raw(self.cursor.visible_text(&self.buffer, visible))
        };
        frame.render_widget(Paragraph::new(content).block(block), area);

        if self.focused && visible > 0 {
            let x = area.x + TEXT_OFFSET + self.cursor.visible_column(&self.buffer).min(visible);
            frame.set_cursor_position((x, area.y + 1));
        }
    }

    fn render_send_button(&mut self, frame: &mut Frame, area: Rect) {
        self.send_button = area;
        let style = if self.can_submit() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let button = Paragraph::new(Line::styled("Send ➤", style))
            .centered()
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(style),
            );
        frame.render_widget(button, area);
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [field_area, button_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(SEND_BUTTON_WIDTH)])
                .areas(area);
        self.render_field(frame, field_area);
        self.render_send_button(frame, button_area);
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_str(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor.pos != 0).then(|| {
                self.cursor.pos = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor.pos != self.buffer.len()).then(|| {
                self.cursor.pos = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => self.submit(),
            TuiEvent::MouseClick(col, row) if self.hits_send_button(*col, *row) => self.submit(),
            // Reserved for multi-line input; the field is single-line today
            TuiEvent::ModifiedEnter => None,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(input: &mut InputBox, text: &str) {
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn draw(input: &mut InputBox, width: u16) -> String {
        let backend = TestBackend::new(width, HEIGHT);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                input.render(f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_input_box_new() {
        let input = InputBox::new();
        assert!(input.buffer.is_empty());
        assert!(input.enabled);
        assert!(!input.can_submit());
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "a");

        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(InputEvent::ContentChanged));
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_cursor_editing() {
        let mut input = InputBox::new();
        type_text(&mut input, "ac");
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "abc");

        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "bc");

        input.handle_event(&TuiEvent::CursorEnd);
        assert_eq!(input.handle_event(&TuiEvent::CursorRight), None);
    }

    #[test]
    fn test_submit_clears_buffer() {
        let mut input = InputBox::new();
        type_text(&mut input, "hello");

        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("Expected Submit event, got {other:?}"),
        }
        assert!(input.buffer.is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn test_whitespace_only_does_not_submit() {
        let mut input = InputBox::new();
        type_text(&mut input, "   ");
        assert!(!input.can_submit());
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   ");
    }

    #[test]
    fn test_modified_enter_never_submits() {
        let mut input = InputBox::new();
        type_text(&mut input, "hello");
        assert_eq!(input.handle_event(&TuiEvent::ModifiedEnter), None);
        assert_eq!(input.buffer, "hello");
    }

    #[test]
    fn test_disabled_keeps_draft() {
        let mut input = InputBox::new();
        type_text(&mut input, "hello");
        input.enabled = false;
        assert!(!input.can_submit());
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "hello");
    }

    #[test]
    fn test_send_button_click_matches_enter() {
        let mut by_enter = InputBox::new();
        type_text(&mut by_enter, "cover letter");
        let enter_event = by_enter.handle_event(&TuiEvent::Submit);

        let mut by_click = InputBox::new();
        type_text(&mut by_click, "cover letter");
        draw(&mut by_click, 40);
        // Button occupies the last SEND_BUTTON_WIDTH columns
        let click_event = by_click.handle_event(&TuiEvent::MouseClick(35, 1));

        assert_eq!(enter_event, Some(InputEvent::Submit("cover letter".into())));
        assert_eq!(click_event, enter_event);
        assert!(by_click.buffer.is_empty());
    }

    #[test]
    fn test_click_outside_button_is_ignored() {
        let mut input = InputBox::new();
        type_text(&mut input, "hi");
        draw(&mut input, 40);
        assert_eq!(input.handle_event(&TuiEvent::MouseClick(3, 1)), None);
        assert_eq!(input.buffer, "hi");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("one\ntwo".into()));
        assert_eq!(input.buffer, "one two");
    }

    #[test]
    fn test_huge_paste_renders_its_tail() {
        let mut input = InputBox::new();
        let mut text = "a".repeat(u16::MAX as usize);
        text.push_str("END");
        input.handle_event(&TuiEvent::Paste(text));

        let screen = draw(&mut input, 40);
        assert!(screen.contains("aEND"));
        assert!(input.can_submit());
    }

    #[test]
    fn test_render_shows_placeholder_when_empty() {
        let mut input = InputBox::new();
        let text = draw(&mut input, 40);
        assert!(text.contains("Type your answer…"));
        assert!(text.contains("Send ➤"));

        type_text(&mut input, "x");
        let text = draw(&mut input, 40);
        assert!(!text.contains("Type your answer"));
    }
}
