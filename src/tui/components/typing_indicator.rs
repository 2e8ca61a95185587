//! # Typing Indicator
//!
//! Assistant-side bubble with three bouncing dots, shown while a reply is
//! pending. Holds no state beyond the animation frame it is handed.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use super::message::{AVATAR_WIDTH, MESSAGE_SPACING};

const DOT: &str = "●";
const DOT_COUNT: usize = 3;
/// Animation frames each dot stays raised.
const FRAMES_PER_DOT: usize = 2;
/// "● ● ●" + borders + padding
const BUBBLE_WIDTH: u16 = (DOT_COUNT as u16 * 2 - 1) + 4;
const BUBBLE_HEIGHT: u16 = 3;

#[derive(Clone, Copy)]
pub struct TypingIndicator {
    pub frame: usize,
}

impl TypingIndicator {
    /// Rows consumed in the transcript, including the gap below.
    pub const HEIGHT: u16 = BUBBLE_HEIGHT + MESSAGE_SPACING;

    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    /// Index of the dot that is currently raised.
    pub fn raised_dot(&self) -> usize {
        (self.frame / FRAMES_PER_DOT) % DOT_COUNT
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::Blue);

        let avatar_area = Rect::new(area.x, area.y, 1, 1).intersection(area);
        Line::styled("◆", style.add_modifier(Modifier::BOLD)).render(avatar_area, buf);

        let bubble_area =
            Rect::new(area.x + AVATAR_WIDTH, area.y, BUBBLE_WIDTH, BUBBLE_HEIGHT).intersection(area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .padding(Padding::horizontal(1));
        let inner = block.inner(bubble_area);
        block.render(bubble_area, buf);

        let raised = self.raised_dot();
        let mut spans = Vec::with_capacity(DOT_COUNT * 2);
        for i in 0..DOT_COUNT {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let dot_style = if i == raised {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
            };
            spans.push(Span::styled(DOT, dot_style));
        }
        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}
