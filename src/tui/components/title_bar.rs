//! # TitleBar Component
//!
//! Top header line: product name, screen name, and transient status.
//!
//! ## Responsibilities
//!
//! - Display the app header
//! - Display the status segment (e.g., "typing…" while a reply is pending)
//! - Show "↓ New" when there's content below the scroll position
//!
//! ## Design Decisions
//!
//! TitleBar is purely presentational: it receives all data as props and has
//! no internal state. Props live in struct fields rather than `render()`
//! parameters because the `Component` trait fixes the `render()` signature.
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Diskarte.ai │ Career Assistant Chat | typing… | ↓ New"`
//! 2. **Status message**: `"Diskarte.ai │ Career Assistant Chat | typing…"`
//! 3. **Default**: `"Diskarte.ai │ Career Assistant Chat"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const BRAND: &str = "Diskarte.ai";
const SCREEN: &str = "Career Assistant Chat";

/// Top status bar component.
///
/// # Props
///
/// - `status_message`: Transient status (e.g., "typing…"), empty for none
/// - `has_unseen_content`: Whether there's content below current scroll position
pub struct TitleBar {
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(status_message: String, has_unseen_content: bool) -> Self {
        Self {
            status_message,
            has_unseen_content,
        }
    }

    fn suffix(&self) -> String {
        match (self.status_message.is_empty(), self.has_unseen_content) {
            (true, false) => String::new(),
            (false, false) => format!(" | {}", self.status_message),
            (true, true) => " | ↓ New".to_string(),
            (false, true) => format!(" | {} | ↓ New", self.status_message),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                BRAND,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::raw(SCREEN),
            Span::styled(self.suffix(), Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(line, area);
    }
}
