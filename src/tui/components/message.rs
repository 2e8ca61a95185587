use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Author, Message};
use crate::tui::component::Component;

/// Columns taken by the avatar glyph plus the gap before the bubble.
pub const AVATAR_WIDTH: u16 = 2;
/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Blank rows after each message.
pub const MESSAGE_SPACING: u16 = 1;
/// Bubbles never exceed this share of the usable width...
const BUBBLE_MAX_PERCENT: u32 = 75;
/// ...unless that would make them narrower than this.
const MIN_BUBBLE_WIDTH: u16 = 24;
/// Columns between two quick-reply chips on the same row.
const CHIP_GAP: u16 = 1;
/// `[ ` + ` ]` around a chip label.
const CHIP_OVERHEAD: u16 = 4;

const BULLET: &str = "• ";
const HANGING_INDENT: &str = "  ";

/// Which edge of the transcript a message hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Outcome of sniffing one line of list-formatted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLine<'a> {
    /// Line started with `•` or `-`; holds the text after the marker.
    Bullet(&'a str),
    /// Anything else, verbatim.
    Paragraph(&'a str),
}

/// Classify a line as a bullet item or a plain paragraph.
///
/// Only `•` and `-` count as markers. Leading whitespace before the marker
/// and whitespace right after it are dropped.
pub fn classify_line(line: &str) -> ListLine<'_> {
    let trimmed = line.trim_start();
    match trimmed
        .strip_prefix('•')
        .or_else(|| trimmed.strip_prefix('-'))
    {
        Some(rest) => ListLine::Bullet(rest.trim_start()),
        None => ListLine::Paragraph(line),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyBlock {
    /// Whole non-list content, line breaks and spacing preserved.
    Text(String),
    Bullet(String),
    Paragraph(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickReplyControl {
    pub index: usize,
    pub label: String,
}

/// The visual tree for one message. Built from a `Message` and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub author: Author,
    pub side: Side,
    pub avatar: &'static str,
    pub body: Vec<BodyBlock>,
    pub quick_replies: Vec<QuickReplyControl>,
}

impl MessageView {
    pub fn build(message: &Message) -> Self {
        let (side, avatar) = match message.author {
            Author::Assistant => (Side::Left, "◆"),
            Author::User => (Side::Right, "●"),
        };

        let body = if message.is_list {
            message
                .content
                .split('\n')
                .map(|line| match classify_line(line) {
                    ListLine::Bullet(text) => BodyBlock::Bullet(text.to_string()),
                    ListLine::Paragraph(text) => BodyBlock::Paragraph(text.to_string()),
                })
                .collect()
        } else {
            vec![BodyBlock::Text(message.content.clone())]
        };

        let quick_replies = message
            .quick_replies
            .iter()
            .enumerate()
            .map(|(index, label)| QuickReplyControl {
                index,
                label: label.clone(),
            })
            .collect();

        Self {
            author: message.author,
            side,
            avatar,
            body,
            quick_replies,
        }
    }

    /// Activate quick-reply control `index`.
    ///
    /// Calls `on_quick_reply` with that control's text and returns true, or
    /// returns false without calling it if there is no such control.
    pub fn activate<F: FnOnce(&str)>(&self, index: usize, on_quick_reply: F) -> bool {
        match self.quick_replies.get(index) {
            Some(control) => {
                on_quick_reply(&control.label);
                true
            }
            None => false,
        }
    }

    /// Compute where everything goes for a transcript `width` columns wide.
    ///
    /// Rects are relative to the message's own top-left corner. The parent
    /// list uses `height` to size the scroll canvas and `chips` for hit
    /// testing, so this must agree exactly with what `MessageBubble` draws.
    pub fn layout(&self, width: u16) -> MessageLayout {
        let usable = width.saturating_sub(AVATAR_WIDTH);
        let max_outer = ((usable as u32 * BUBBLE_MAX_PERCENT / 100) as u16)
            .max(MIN_BUBBLE_WIDTH)
            .min(usable);
        let inner_max = max_outer.saturating_sub(HORIZONTAL_OVERHEAD);
        if inner_max == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            // Return 1 row so the message still occupies space in the layout.
            return MessageLayout {
                rows: Vec::new(),
                avatar: Rect::default(),
                bubble: Rect::default(),
                chips: vec![Rect::default(); self.quick_replies.len()],
                height: 1,
            };
        }

        let rows = wrap_rows(&self.body, inner_max);
        let content_width = rows
            .iter()
            .map(|row| (row.prefix.width() + row.text.width()) as u16)
            .max()
            .unwrap_or(0)
            .clamp(1, inner_max);
        let bubble_width = content_width + HORIZONTAL_OVERHEAD;
        let bubble_height = rows.len() as u16 + VERTICAL_OVERHEAD;

        let right_edge = width.saturating_sub(AVATAR_WIDTH);
        let (avatar_x, bubble_x) = match self.side {
            Side::Left => (0, AVATAR_WIDTH),
            Side::Right => (
                width.saturating_sub(1),
                right_edge.saturating_sub(bubble_width),
            ),
        };

        let chip_widths: Vec<u16> = self
            .quick_replies
            .iter()
            .map(|c| (c.label.width() as u16).saturating_add(CHIP_OVERHEAD).min(max_outer))
            .collect();
        let flow = flow_chips(&chip_widths, max_outer);
        let chips = flow
            .slots
            .iter()
            .zip(&chip_widths)
            .map(|(&(row, x), &w)| {
                let row_start = match self.side {
                    Side::Left => AVATAR_WIDTH,
                    Side::Right => right_edge.saturating_sub(flow.row_widths[row as usize]),
                };
                Rect::new(row_start + x, bubble_height + row, w, 1)
            })
            .collect();

        MessageLayout {
            rows,
            avatar: Rect::new(avatar_x, 0, 1, 1),
            bubble: Rect::new(bubble_x, 0, bubble_width, bubble_height),
            chips,
            height: bubble_height + flow.row_widths.len() as u16 + MESSAGE_SPACING,
        }
    }
}

/// One wrapped row of bubble text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyRow {
    pub prefix: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLayout {
    pub rows: Vec<BodyRow>,
    pub avatar: Rect,
    pub bubble: Rect,
    /// One rect per quick reply, same order as `MessageView::quick_replies`.
    pub chips: Vec<Rect>,
    pub height: u16,
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn wrap_line(line: &str, width: u16) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    textwrap::wrap(line, wrap_options(width))
        .into_iter()
        .map(|l| l.into_owned())
        .collect()
}

fn wrap_rows(body: &[BodyBlock], width: u16) -> Vec<BodyRow> {
    let mut rows = Vec::new();
    for block in body {
        match block {
            BodyBlock::Text(text) => {
                for line in text.split('\n') {
                    rows.extend(wrap_line(line, width).into_iter().map(|text| BodyRow {
                        prefix: "",
                        text,
                    }));
                }
            }
            BodyBlock::Paragraph(text) => {
                rows.extend(wrap_line(text, width).into_iter().map(|text| BodyRow {
                    prefix: "",
                    text,
                }));
            }
            BodyBlock::Bullet(text) => {
                let indent = BULLET.width() as u16;
                let wrapped = wrap_line(text, width.saturating_sub(indent));
                rows.extend(wrapped.into_iter().enumerate().map(|(i, text)| BodyRow {
                    prefix: if i == 0 { BULLET } else { HANGING_INDENT },
                    text,
                }));
            }
        }
    }
    rows
}

struct ChipFlow {
    /// (row, x within row) per chip
    slots: Vec<(u16, u16)>,
    row_widths: Vec<u16>,
}

/// Lay chips left to right, starting a new row when the next one won't fit.
fn flow_chips(widths: &[u16], max_width: u16) -> ChipFlow {
    let mut slots = Vec::with_capacity(widths.len());
    let mut row_widths: Vec<u16> = Vec::new();
    for &w in widths {
        let fits = row_widths
            .last()
            .is_some_and(|&used| used + CHIP_GAP + w <= max_width);
        if fits {
            let row = row_widths.len() - 1;
            let used = &mut row_widths[row];
            slots.push((row as u16, *used + CHIP_GAP));
            *used += CHIP_GAP + w;
        } else {
            slots.push((row_widths.len() as u16, 0));
            row_widths.push(w);
        }
    }
    ChipFlow { slots, row_widths }
}

fn author_style(author: Author) -> Style {
    match author {
        Author::User => Style::default().fg(Color::Green),
        Author::Assistant => Style::default().fg(Color::Blue),
    }
}

fn author_label(author: Author) -> &'static str {
    match author {
        Author::User => "you",
        Author::Assistant => "diskarte",
    }
}

/// Draws a `MessageView` according to its `MessageLayout`.
///
/// Created fresh each frame. `focused_reply` is the quick reply that has
/// keyboard focus, if it belongs to this message.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub view: &'a MessageView,
    pub layout: &'a MessageLayout,
    pub focused_reply: Option<usize>,
}

impl<'a> MessageBubble<'a> {
    pub fn new(view: &'a MessageView, layout: &'a MessageLayout, focused_reply: Option<usize>) -> Self {
        Self {
            view,
            layout,
            focused_reply,
        }
    }
}

impl Widget for MessageBubble<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.layout.bubble.is_empty() {
            return;
        }
        let place = |r: Rect| {
            Rect::new(area.x + r.x, area.y + r.y, r.width, r.height).intersection(area)
        };
        let style = author_style(self.view.author);

        Line::styled(self.view.avatar, style.add_modifier(Modifier::BOLD))
            .render(place(self.layout.avatar), buf);

        let block = Block::bordered()
            .title(author_label(self.view.author))
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .title_style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let bubble_area = place(self.layout.bubble);
        let inner = block.inner(bubble_area);
        block.render(bubble_area, buf);

        let lines: Vec<Line> = self
            .layout
            .rows
            .iter()
            .map(|row| {
                Line::from(vec![
                    Span::styled(row.prefix, style),
                    Span::raw(row.text.as_str()),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);

        for (control, rect) in self.view.quick_replies.iter().zip(&self.layout.chips) {
            let chip_style = if self.focused_reply == Some(control.index) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Line::styled(format!("[ {} ]", control.label), chip_style).render(place(*rect), buf);
        }
    }
}

/// `MessageBubble` is stateless; this delegates to the [`Widget`] impl.
impl Component for MessageBubble<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
